//! Unified error handling for the track analytics engine.
//!
//! Noisy GPS data is never an error here: missing or malformed fields only
//! exclude a point from the calculation that needs them. The variants below
//! cover the remaining caller mistakes (bad configuration, input that is not a
//! point sequence at all).

use std::fmt;

/// Unified error type for track analytics operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Error))]
#[cfg_attr(feature = "ffi", uniffi(flat_error))]
pub enum TrackError {
    /// Caller passed something that is not a point sequence
    InvalidInput { message: String },
    /// Configuration values are out of range
    InvalidConfig { message: String },
    /// Input could not be parsed at all
    Parse { message: String },
}

impl TrackError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        TrackError::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        TrackError::InvalidConfig {
            message: message.into(),
        }
    }
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::InvalidInput { message } => {
                write!(f, "Invalid input: {}", message)
            }
            TrackError::InvalidConfig { message } => {
                write!(f, "Configuration error: {}", message)
            }
            TrackError::Parse { message } => {
                write!(f, "Parse error: {}", message)
            }
        }
    }
}

impl std::error::Error for TrackError {}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        TrackError::Parse {
            message: err.to_string(),
        }
    }
}

/// Result type alias for track analytics operations.
pub type Result<T> = std::result::Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackError::invalid_config("window_size must be at least 1");
        assert_eq!(
            err.to_string(),
            "Configuration error: window_size must be at least 1"
        );

        let err = TrackError::invalid_input("expected an array of points");
        assert!(err.to_string().starts_with("Invalid input"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: TrackError = serde_json::from_str::<Vec<f64>>("[1.0,")
            .unwrap_err()
            .into();
        assert!(matches!(err, TrackError::Parse { .. }));
    }
}
