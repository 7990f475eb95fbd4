use std::sync::Arc;

use models::{Record, RecordInput};
use tracing::{info, instrument};

use crate::{errors::ServiceError, storage::RecordStore};

/// Create/list/get/update/delete over one `RecordStore`.
///
/// Inputs are validated before the store is touched, so a rejected request
/// never mutates anything.
pub struct CollectionService<T> {
    store: Arc<RecordStore<T>>,
}

impl<T> Clone for CollectionService<T> {
    fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<T: Record> CollectionService<T> {
    pub fn new(store: Arc<RecordStore<T>>) -> Self { Self { store } }

    pub fn store(&self) -> &Arc<RecordStore<T>> { &self.store }

    #[instrument(skip_all, fields(entity = T::ENTITY))]
    pub async fn create<I>(&self, input: &I) -> Result<T, ServiceError>
    where
        I: RecordInput<Record = T>,
    {
        let fields = input.validate()?;
        self.insert_validated(fields).await
    }

    /// Commit fields that have already passed every check.
    pub(crate) async fn insert_validated(&self, fields: T::Fields) -> Result<T, ServiceError> {
        let created = self.store.insert(fields).await?;
        common::metrics::record_created(T::ENTITY);
        info!(entity = T::ENTITY, id = created.id(), "record_created");
        Ok(created)
    }

    pub async fn list(&self) -> Vec<T> {
        self.store.list().await
    }

    pub async fn get(&self, id: u64) -> Result<T, ServiceError> {
        self.store.get_by_id(id).await.ok_or_else(|| ServiceError::not_found(T::LABEL))
    }

    /// Replace all fields of an existing record. Validation runs first, so
    /// a bad body on an unknown id reports the validation errors.
    #[instrument(skip(self, input), fields(entity = T::ENTITY))]
    pub async fn update<I>(&self, id: u64, input: &I) -> Result<T, ServiceError>
    where
        I: RecordInput<Record = T>,
    {
        let fields = input.validate()?;
        let updated = self
            .store
            .replace_by_id(id, fields)
            .await?
            .ok_or_else(|| ServiceError::not_found(T::LABEL))?;
        info!(entity = T::ENTITY, id, "record_updated");
        Ok(updated)
    }

    /// Idempotent: deleting an unknown id succeeds as well.
    pub async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        if self.store.delete_by_id(id).await? {
            common::metrics::record_deleted(T::ENTITY);
            info!(entity = T::ENTITY, id, "record_deleted");
        }
        Ok(())
    }
}
