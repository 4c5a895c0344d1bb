/// Result returned by scheduler callbacks.
pub type CallbackResult = Result<(), CallbackError>;

/// A fault raised by an update or render callback.
///
/// The scheduler logs it and carries on with the remaining callbacks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CallbackError(pub String);

impl CallbackError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for CallbackError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for CallbackError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}
