use thiserror::Error;

/// Ordered field-level validation messages for one request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", .0.join("; "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn new() -> Self { Self::default() }

    pub fn single(message: impl Into<String>) -> Self { Self(vec![message.into()]) }

    pub fn push(&mut self, message: impl Into<String>) { self.0.push(message.into()); }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn messages(&self) -> &[String] { &self.0 }

    pub fn into_messages(self) -> Vec<String> { self.0 }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}
