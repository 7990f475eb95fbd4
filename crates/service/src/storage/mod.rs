//! Storage abstractions for service layer
//!
//! `RecordStore` holds one entity type, either purely in memory or mirrored
//! to a JSON snapshot file.

pub mod record_store;

pub use record_store::RecordStore;
