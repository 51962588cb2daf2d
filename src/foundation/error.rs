/// Convenience result type used across KloudySky.
pub type KloudyResult<T> = Result<T, KloudyError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum KloudyError {
    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or executing a frame plan.
    #[error("render error: {0}")]
    Render(String),

    /// Transport or protocol failures talking to the form relay.
    #[error("relay error: {0}")]
    Relay(String),

    /// Errors while loading site configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KloudyError {
    /// Build a [`KloudyError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KloudyError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`KloudyError::Relay`] value.
    pub fn relay(msg: impl Into<String>) -> Self {
        Self::Relay(msg.into())
    }

    /// Build a [`KloudyError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`KloudyError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for KloudyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
