// --- File: crates/salonsync_common/src/services.rs ---
//! Service abstractions for persistence.
//!
//! Handlers and the voice tools only see [`AppointmentStore`], so the
//! Firestore backend and the in-memory store are interchangeable.

use std::future::Future;
use std::pin::Pin;

use crate::error::SalonSyncError;
use crate::live::LiveCollection;
use crate::models::{Appointment, AppointmentPatch, Client, NewAppointment, NewClient};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A store for the salon's clients and appointments.
///
/// Writes are not checked for conflicts and are never retried. Implementations
/// keep the live collections current so readers see each write shortly after
/// it succeeds.
pub trait AppointmentStore: Send + Sync {
    /// Register a client. The name must not be blank.
    fn add_client(&self, client: NewClient) -> BoxFuture<'_, Client, SalonSyncError>;

    /// Create an appointment and return it with its generated id.
    fn add_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, Appointment, SalonSyncError>;

    /// Write only the fields present in `patch`.
    fn update_appointment(
        &self,
        id: &str,
        patch: AppointmentPatch,
    ) -> BoxFuture<'_, (), SalonSyncError>;

    /// Remove an appointment. Removing an unknown id is not an error.
    fn delete_appointment(&self, id: &str) -> BoxFuture<'_, (), SalonSyncError>;

    /// Read the appointments straight from the backing store.
    fn list_appointments(&self) -> BoxFuture<'_, Vec<Appointment>, SalonSyncError>;

    /// Read the clients straight from the backing store.
    fn list_clients(&self) -> BoxFuture<'_, Vec<Client>, SalonSyncError>;

    /// Live view of all appointments.
    fn appointments(&self) -> &LiveCollection<Appointment>;

    /// Live view of all clients.
    fn clients(&self) -> &LiveCollection<Client>;
}
