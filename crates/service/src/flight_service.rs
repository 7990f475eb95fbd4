use std::sync::Arc;

use models::{Flight, FlightInput};
use tracing::{info, instrument, warn};

use crate::{
    collection::CollectionService,
    errors::ServiceError,
    storage::RecordStore,
    user_directory::{verify_user, UserCheck, UserDirectory},
};

/// Flight collection whose create step checks the referenced user first.
#[derive(Clone)]
pub struct FlightService {
    flights: CollectionService<Flight>,
    users: Arc<dyn UserDirectory>,
}

impl FlightService {
    pub fn new(store: Arc<RecordStore<Flight>>, users: Arc<dyn UserDirectory>) -> Self {
        Self { flights: CollectionService::new(store), users }
    }

    pub fn store(&self) -> &Arc<RecordStore<Flight>> { self.flights.store() }

    /// Validate fields, then (if `userId` is set) confirm the user exists,
    /// then insert. Nothing is written unless every step passes.
    ///
    /// The store lock is only taken for the final insert, never while the
    /// user service is being called.
    #[instrument(skip_all)]
    pub async fn create(&self, input: &FlightInput) -> Result<Flight, ServiceError> {
        let fields = input.validate()?;
        if let Some(user_id) = fields.user_id {
            match verify_user(self.users.as_ref(), user_id).await {
                UserCheck::Validated => info!(user_id, "user reference validated"),
                UserCheck::Rejected(reason) => {
                    warn!(user_id, ?reason, "flight rejected by user check");
                    return Err(reason.into());
                }
            }
        }
        self.flights.insert_validated(fields).await
    }

    pub async fn list(&self) -> Vec<Flight> { self.flights.list().await }

    pub async fn get(&self, id: u64) -> Result<Flight, ServiceError> { self.flights.get(id).await }

    /// Replace fields; the user reference is not re-checked on update.
    pub async fn update(&self, id: u64, input: &FlightInput) -> Result<Flight, ServiceError> {
        self.flights.update(id, input).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> { self.flights.delete(id).await }
}
