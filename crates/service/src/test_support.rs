#![cfg(test)]
use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{errors::DirectoryError, user_directory::UserDirectory};

/// Unique snapshot path under the system temp dir for one test.
pub fn temp_store_path(prefix: &str) -> PathBuf {
    std::env::temp_dir()
        .join("flight_booking_tests")
        .join(format!("{prefix}_{}.json", uuid::Uuid::new_v4()))
}

/// Directory double that always answers the same way and counts calls.
pub struct FixedDirectory {
    answer: Result<bool, DirectoryError>,
    pub calls: AtomicUsize,
}

impl FixedDirectory {
    pub fn exists() -> Self { Self::answering(Ok(true)) }

    pub fn missing() -> Self { Self::answering(Ok(false)) }

    pub fn failing(err: DirectoryError) -> Self { Self::answering(Err(err)) }

    fn answering(answer: Result<bool, DirectoryError>) -> Self {
        Self { answer, calls: AtomicUsize::new(0) }
    }

    pub fn call_count(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl UserDirectory for FixedDirectory {
    async fn check_exists(&self, _id: u64) -> Result<bool, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}
