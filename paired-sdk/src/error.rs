// ABOUTME: Error types for paired fetching with user-friendly messages
// ABOUTME: Folds transport, status, and decode failures into one error per leg

use thiserror::Error;

/// Terminal failure of a paired fetch. One per invocation, named after the
/// leg that failed first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Image could not be fetched: {cause}")]
    BadImage { cause: LegFailure },

    #[error("Metadata could not be fetched: {cause}")]
    InvalidMetadata { cause: LegFailure },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    BadImage,
    InvalidMetadata,
}

impl FetchError {
    pub fn bad_image(cause: impl Into<LegFailure>) -> Self {
        FetchError::BadImage {
            cause: cause.into(),
        }
    }

    pub fn invalid_metadata(cause: impl Into<LegFailure>) -> Self {
        FetchError::InvalidMetadata {
            cause: cause.into(),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::BadImage { .. } => FetchErrorKind::BadImage,
            FetchError::InvalidMetadata { .. } => FetchErrorKind::InvalidMetadata,
        }
    }

    pub fn cause(&self) -> &LegFailure {
        match self {
            FetchError::BadImage { cause } | FetchError::InvalidMetadata { cause } => cause,
        }
    }

    pub fn help_text(&self) -> Option<&'static str> {
        match self.cause() {
            LegFailure::Transport(TransportError::Network(_)) => {
                Some("Check your internet connection and try again")
            }
            LegFailure::Transport(TransportError::TimedOut) => {
                Some("The server did not answer in time; try again later")
            }
            LegFailure::Status(404) => Some("No resource exists for this id"),
            LegFailure::Undecodable(_) => {
                Some("The server answered, but the payload is not in the expected format")
            }
            _ => None,
        }
    }
}

/// Why a single leg failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LegFailure {
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("no response was received")]
    MissingResponse,

    #[error("response carried no body")]
    MissingBody,

    #[error("payload could not be decoded: {0}")]
    Undecodable(String),
}

impl From<DecodeError> for LegFailure {
    fn from(err: DecodeError) -> Self {
        LegFailure::Undecodable(err.to_string())
    }
}

impl From<FormatError> for LegFailure {
    fn from(err: FormatError) -> Self {
        LegFailure::Undecodable(err.to_string())
    }
}

/// Failure of the underlying transport, before any status is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: request took too long to complete")]
    TimedOut,

    #[error("Request was cancelled before it completed")]
    Cancelled,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::TimedOut
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid metadata: {message}")]
pub struct DecodeError {
    pub message: String,
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Image data is empty")]
    Empty,

    #[error("Unrecognized image format")]
    Unrecognized,

    #[error("Corrupt {format} image: {message}")]
    Corrupt { format: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("No tokio runtime is available; construct the fetcher inside a runtime or pass a handle")]
    NoRuntime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::bad_image(LegFailure::Status(404)).to_string(),
            "Image could not be fetched: unexpected HTTP status 404"
        );
        assert_eq!(
            FetchError::invalid_metadata(LegFailure::MissingBody).to_string(),
            "Metadata could not be fetched: response carried no body"
        );
        assert_eq!(
            TransportError::Network("Connection refused".to_string()).to_string(),
            "Network error: Connection refused"
        );
        assert_eq!(
            ConfigError::Invalid("bad base".to_string()).to_string(),
            "Configuration error: bad base"
        );
    }

    #[test]
    fn test_transport_error_folds_into_leg() {
        let err = FetchError::bad_image(TransportError::TimedOut);
        assert_eq!(err.kind(), FetchErrorKind::BadImage);
        assert_eq!(err.cause(), &LegFailure::Transport(TransportError::TimedOut));

        let err = FetchError::invalid_metadata(TransportError::Cancelled);
        assert_eq!(err.kind(), FetchErrorKind::InvalidMetadata);
    }

    #[test]
    fn test_decode_errors_become_undecodable() {
        let failure: LegFailure = FormatError::Unrecognized.into();
        assert_eq!(
            failure,
            LegFailure::Undecodable("Unrecognized image format".to_string())
        );

        let decode = DecodeError {
            message: "missing field `year`".to_string(),
        };
        let failure: LegFailure = decode.into();
        assert!(failure.to_string().contains("missing field `year`"));
    }

    #[test]
    fn test_help_text() {
        assert_eq!(
            FetchError::bad_image(LegFailure::Status(404)).help_text(),
            Some("No resource exists for this id")
        );
        assert!(FetchError::invalid_metadata(TransportError::Network("x".into()))
            .help_text()
            .is_some());
        assert_eq!(
            FetchError::bad_image(LegFailure::MissingBody).help_text(),
            None
        );
    }
}
