use thiserror::Error;

/// Signal engine error types.
#[derive(Error, Debug)]
pub enum SignalError {
    /// The series is shorter than the operation's minimum. Recoverable by
    /// fetching more history.
    #[error("Insufficient data for {operation}: {required} records required, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Invalid prediction estimate: {0}")]
    InvalidEstimate(String),
}

impl SignalError {
    /// Shorthand for an `InsufficientData` error.
    pub fn insufficient(operation: &'static str, required: usize, actual: usize) -> Self {
        SignalError::InsufficientData {
            operation,
            required,
            actual,
        }
    }

    /// Whether the caller can recover by supplying a longer series.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SignalError::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;
