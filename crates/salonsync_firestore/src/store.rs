//! Firestore-backed [`AppointmentStore`]
//!
//! Documents live under `users/{owner_uid}/clients` and
//! `users/{owner_uid}/appointments`. The REST API has no streaming listen, so
//! each collection gets a poller task that re-lists it every poll interval and
//! right after each local write, publishing a new snapshot only when the list
//! changed.

use std::sync::Arc;
use std::time::Duration;

use salonsync_common::error::SalonSyncError;
use salonsync_common::live::LiveCollection;
use salonsync_common::models::{Appointment, AppointmentPatch, Client, NewAppointment, NewClient};
use salonsync_common::services::{AppointmentStore, BoxFuture};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::client::{Document, FirestoreClient, FirestoreError};
use crate::codec::{
    decode_appointment, decode_client, encode_appointment, encode_client, encode_patch,
};

/// Default seconds between live-query refreshes
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Clients,
    Appointments,
}

impl Collection {
    fn name(self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Appointments => "appointments",
        }
    }
}

/// Store for one salon operator's clients and appointments
#[derive(Debug)]
pub struct FirestoreStore {
    client: FirestoreClient,
    owner_uid: String,
    clients: LiveCollection<Client>,
    appointments: LiveCollection<Appointment>,
    clients_written: Notify,
    appointments_written: Notify,
}

/// Decodes every document, skipping (and logging) the malformed ones.
fn decode_all<T>(
    documents: &[Document],
    decode: impl Fn(&Document) -> Result<T, FirestoreError>,
) -> Vec<T> {
    documents
        .iter()
        .filter_map(|doc| match decode(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping document: {}", e);
                None
            }
        })
        .collect()
}

impl FirestoreStore {
    pub fn new(client: FirestoreClient, owner_uid: impl Into<String>) -> Self {
        Self {
            client,
            owner_uid: owner_uid.into(),
            clients: LiveCollection::new(),
            appointments: LiveCollection::new(),
            clients_written: Notify::new(),
            appointments_written: Notify::new(),
        }
    }

    fn collection_path(&self, collection: Collection) -> String {
        format!("users/{}/{}", self.owner_uid, collection.name())
    }

    fn appointment_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection_path(Collection::Appointments), id)
    }

    async fn fetch_clients(&self) -> Result<Vec<Client>, FirestoreError> {
        let docs = self
            .client
            .list_documents(&self.collection_path(Collection::Clients))
            .await?;
        Ok(decode_all(&docs, decode_client))
    }

    async fn fetch_appointments(&self) -> Result<Vec<Appointment>, FirestoreError> {
        let docs = self
            .client
            .list_documents(&self.collection_path(Collection::Appointments))
            .await?;
        Ok(decode_all(&docs, decode_appointment))
    }

    async fn refresh(&self, collection: Collection) -> Result<bool, FirestoreError> {
        let changed = match collection {
            Collection::Clients => self.clients.replace(self.fetch_clients().await?),
            Collection::Appointments => self.appointments.replace(self.fetch_appointments().await?),
        };
        if changed {
            debug!("Live {} snapshot updated", collection.name());
        }
        Ok(changed)
    }

    /// Loads both collections once. Used at startup before the pollers run.
    pub async fn refresh_all(&self) -> Result<(), FirestoreError> {
        self.refresh(Collection::Clients).await?;
        self.refresh(Collection::Appointments).await?;
        info!(
            clients = self.clients.snapshot().len(),
            appointments = self.appointments.snapshot().len(),
            "Firestore collections loaded"
        );
        Ok(())
    }

    fn written(&self, collection: Collection) -> &Notify {
        match collection {
            Collection::Clients => &self.clients_written,
            Collection::Appointments => &self.appointments_written,
        }
    }

    /// Starts one live-query poller per collection.
    ///
    /// The tasks run for the lifetime of the process; abort the handles to
    /// stop them.
    pub fn spawn_live_queries(self: &Arc<Self>, interval: Duration) -> Vec<JoinHandle<()>> {
        [Collection::Clients, Collection::Appointments]
            .into_iter()
            .map(|collection| {
                let store = Arc::clone(self);
                tokio::spawn(async move { store.poll(collection, interval).await })
            })
            .collect()
    }

    async fn poll(&self, collection: Collection, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.written(collection).notified() => {}
            }
            if let Err(e) = self.refresh(collection).await {
                error!("Live query for {} failed: {}", collection.name(), e);
            }
        }
    }
}

impl AppointmentStore for FirestoreStore {
    fn add_client(&self, client: NewClient) -> BoxFuture<'_, Client, SalonSyncError> {
        Box::pin(async move {
            client.validate()?;
            let doc = self
                .client
                .create_document(
                    &self.collection_path(Collection::Clients),
                    encode_client(&client),
                )
                .await
                .map_err(|e| {
                    error!("Error adding client: {}", e);
                    SalonSyncError::from(e)
                })?;
            self.clients_written.notify_one();
            info!(client_id = %doc.id(), "Client added");
            Ok(client.into_client(doc.id().to_string()))
        })
    }

    fn add_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, Appointment, SalonSyncError> {
        Box::pin(async move {
            let doc = self
                .client
                .create_document(
                    &self.collection_path(Collection::Appointments),
                    encode_appointment(&appointment),
                )
                .await
                .map_err(|e| {
                    error!("Error adding appointment: {}", e);
                    SalonSyncError::from(e)
                })?;
            self.appointments_written.notify_one();
            info!(appointment_id = %doc.id(), "Appointment added");
            Ok(appointment.into_appointment(doc.id().to_string()))
        })
    }

    fn update_appointment(
        &self,
        id: &str,
        patch: AppointmentPatch,
    ) -> BoxFuture<'_, (), SalonSyncError> {
        let path = self.appointment_path(id);
        Box::pin(async move {
            let (fields, mask) = encode_patch(&patch);
            self.client
                .patch_document(&path, fields, &mask)
                .await
                .map_err(|e| {
                    error!("Error updating appointment: {}", e);
                    SalonSyncError::from(e)
                })?;
            self.appointments_written.notify_one();
            Ok(())
        })
    }

    fn delete_appointment(&self, id: &str) -> BoxFuture<'_, (), SalonSyncError> {
        let path = self.appointment_path(id);
        Box::pin(async move {
            self.client.delete_document(&path).await.map_err(|e| {
                error!("Error deleting appointment: {}", e);
                SalonSyncError::from(e)
            })?;
            self.appointments_written.notify_one();
            Ok(())
        })
    }

    fn list_appointments(&self) -> BoxFuture<'_, Vec<Appointment>, SalonSyncError> {
        Box::pin(async move { Ok(self.fetch_appointments().await?) })
    }

    fn list_clients(&self) -> BoxFuture<'_, Vec<Client>, SalonSyncError> {
        Box::pin(async move { Ok(self.fetch_clients().await?) })
    }

    fn appointments(&self) -> &LiveCollection<Appointment> {
        &self.appointments
    }

    fn clients(&self) -> &LiveCollection<Client> {
        &self.clients
    }
}
