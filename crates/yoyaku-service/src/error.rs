use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CoreError(#[from] yoyaku_core::error::CoreError),

    /// A submitted field failed its format rules. Reported against the
    /// offending field; blocks the EnterInfo transition and goes no further.
    #[error("Validation error on {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// An availability fetch or persistence call failed to complete.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The store answered, but with a failure that is neither a conflict
    /// nor a transport error.
    #[error("Store error: {0}")]
    Store(String),

    /// The chosen slot was already booked by the time the store processed
    /// the request. The caller must reselect a slot.
    #[error("Conflict: slot already booked")]
    Conflict,

    /// A transition was attempted from a state that does not permit it.
    #[error("Invalid transition: {0}")]
    State(&'static str),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
