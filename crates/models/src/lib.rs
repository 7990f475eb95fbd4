//! Record types shared by the user and flight services.
//! - `Record` ties a stored entity to the validated fields it is built from.
//! - Inputs deserialize leniently so every bad field can be reported at once.

pub mod errors;
pub mod flight;
pub mod record;
pub mod user;
pub mod validation;

pub use errors::ValidationErrors;
pub use flight::{Flight, FlightFields, FlightInput};
pub use record::{Record, RecordInput};
pub use user::{User, UserFields, UserInput};
