//! Shared plumbing for the user and flight services: log setup, the health
//! payload and the Prometheus registry both processes expose.

pub mod metrics;
pub mod types;
pub mod utils;
