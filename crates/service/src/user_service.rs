use std::sync::Arc;

use async_trait::async_trait;
use models::User;

use crate::{
    collection::CollectionService,
    errors::DirectoryError,
    storage::RecordStore,
    user_directory::UserDirectory,
};

pub type UserService = CollectionService<User>;

/// Answers existence checks straight from an in-process user store.
#[derive(Clone)]
pub struct LocalUserDirectory {
    store: Arc<RecordStore<User>>,
}

impl LocalUserDirectory {
    pub fn new(store: Arc<RecordStore<User>>) -> Self { Self { store } }
}

#[async_trait]
impl UserDirectory for LocalUserDirectory {
    async fn check_exists(&self, id: u64) -> Result<bool, DirectoryError> {
        Ok(self.store.get_by_id(id).await.is_some())
    }
}
