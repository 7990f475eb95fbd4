//! Service layer for the user and flight collections.
//! - `RecordStore` owns records and id assignment.
//! - `CollectionService` maps CRUD operations onto a store with validation.
//! - `FlightService` adds the cross-service user check on create.

pub mod collection;
pub mod errors;
pub mod flight_service;
pub mod storage;
#[cfg(test)]
pub mod test_support;
pub mod user_directory;
pub mod user_service;

pub use collection::CollectionService;
pub use errors::{DirectoryError, ServiceError};
pub use flight_service::FlightService;
pub use storage::RecordStore;
pub use user_directory::{HttpUserDirectory, UserDirectory};
pub use user_service::{LocalUserDirectory, UserService};
