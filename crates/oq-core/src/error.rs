/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised when constructing core records.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An oath identifier was empty or contained whitespace.
    #[error("invalid oath id: \"{0}\"")]
    InvalidOathId(String),

    /// A numeric value was outside its allowed range.
    #[error("value out of range for {field}: {value}")]
    OutOfRange {
        /// The offending field.
        field: &'static str,
        /// The rejected value, rendered for display.
        value: String,
    },
}
