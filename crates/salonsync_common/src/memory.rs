// --- File: crates/salonsync_common/src/memory.rs ---
//! In-process [`AppointmentStore`] used when Firestore is switched off.

use std::sync::Mutex;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{internal_error, not_found, SalonSyncError};
use crate::live::LiveCollection;
use crate::models::{Appointment, AppointmentPatch, Client, NewAppointment, NewClient};
use crate::services::{AppointmentStore, BoxFuture};

/// Keeps everything in the live collections themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    clients: LiveCollection<Client>,
    appointments: LiveCollection<Appointment>,
    // Serializes read-modify-write cycles on the collections.
    write_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with existing records.
    pub fn with_data(clients: Vec<Client>, appointments: Vec<Appointment>) -> Self {
        Self {
            clients: LiveCollection::with_items(clients),
            appointments: LiveCollection::with_items(appointments),
            write_lock: Mutex::new(()),
        }
    }

    fn locked<R>(&self, f: impl FnOnce() -> R) -> Result<R, SalonSyncError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| internal_error("memory store lock poisoned"))?;
        Ok(f())
    }
}

impl AppointmentStore for MemoryStore {
    fn add_client(&self, client: NewClient) -> BoxFuture<'_, Client, SalonSyncError> {
        Box::pin(async move {
            client.validate()?;
            let client = client.into_client(Uuid::new_v4().to_string());
            self.locked(|| self.clients.update(|items| items.push(client.clone())))?;
            info!(client_id = %client.id, "Client added");
            Ok(client)
        })
    }

    fn add_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, Appointment, SalonSyncError> {
        Box::pin(async move {
            let appointment = appointment.into_appointment(Uuid::new_v4().to_string());
            self.locked(|| {
                self.appointments
                    .update(|items| items.push(appointment.clone()))
            })?;
            info!(appointment_id = %appointment.id, start = %appointment.start_time, "Appointment added");
            Ok(appointment)
        })
    }

    fn update_appointment(
        &self,
        id: &str,
        patch: AppointmentPatch,
    ) -> BoxFuture<'_, (), SalonSyncError> {
        let id = id.to_string();
        Box::pin(async move {
            let found = self.locked(|| {
                self.appointments.update(|items| {
                    match items.iter_mut().find(|a| a.id == id) {
                        Some(appointment) => {
                            patch.apply_to(appointment);
                            true
                        }
                        None => false,
                    }
                })
            })?;
            if !found {
                return Err(not_found(format!("appointment {}", id)));
            }
            debug!(appointment_id = %id, "Appointment updated");
            Ok(())
        })
    }

    fn delete_appointment(&self, id: &str) -> BoxFuture<'_, (), SalonSyncError> {
        let id = id.to_string();
        Box::pin(async move {
            self.locked(|| self.appointments.update(|items| items.retain(|a| a.id != id)))?;
            debug!(appointment_id = %id, "Appointment deleted");
            Ok(())
        })
    }

    fn list_appointments(&self) -> BoxFuture<'_, Vec<Appointment>, SalonSyncError> {
        Box::pin(async move { Ok(self.appointments.snapshot().as_ref().clone()) })
    }

    fn list_clients(&self) -> BoxFuture<'_, Vec<Client>, SalonSyncError> {
        Box::pin(async move { Ok(self.clients.snapshot().as_ref().clone()) })
    }

    fn appointments(&self) -> &LiveCollection<Appointment> {
        &self.appointments
    }

    fn clients(&self) -> &LiveCollection<Client> {
        &self.clients
    }
}
