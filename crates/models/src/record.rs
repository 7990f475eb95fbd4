use serde::{de::DeserializeOwned, Serialize};

/// An entity a record store can hold.
///
/// The store owns id assignment; callers only ever hand it `Fields`, which
/// have already passed validation.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Fields: Send;

    /// Lower-case entity name used in logs and metrics labels.
    const ENTITY: &'static str;

    /// Capitalised name used in client-facing messages.
    const LABEL: &'static str;

    fn id(&self) -> u64;

    fn from_fields(id: u64, fields: Self::Fields) -> Self;

    /// Overwrite every field except the id.
    fn replace_fields(&mut self, fields: Self::Fields);
}

/// A request body that validates into the fields of `Self::Record`.
pub trait RecordInput: Send + Sync {
    type Record: Record;

    fn validate(&self) -> Result<<Self::Record as Record>::Fields, crate::ValidationErrors>;
}
