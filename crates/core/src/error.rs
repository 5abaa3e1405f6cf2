/// Errors raised by pure domain logic.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid check type: '{0}'")]
    InvalidCheckType(String),
}
