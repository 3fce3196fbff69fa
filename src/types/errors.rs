use std::fmt;

pub const GENERIC_SUMMARY_FAILURE: &str = "Failed to generate summary.";

// === ApiError ===

/// Errors returned by calls to the bookmarks API.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    Network(String),
    /// The server answered 404 for the given path.
    NotFound(String),
    /// The server answered with another non-success status.
    Server { status: u16, message: String },
    /// A success response carried a body that could not be decoded.
    Decode(String),
    /// The request was rejected before being sent.
    InvalidInput(String),
}

impl ApiError {
    /// Text suitable for an alert: the server message when there is one,
    /// otherwise the generic summary failure text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } if !message.is_empty() => message.clone(),
            ApiError::InvalidInput(msg) => msg.clone(),
            _ => GENERIC_SUMMARY_FAILURE.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "API network error: {}", msg),
            ApiError::NotFound(path) => write!(f, "API resource not found: {}", path),
            ApiError::Server { status, message } => {
                write!(f, "API server error ({}): {}", status, message)
            }
            ApiError::Decode(msg) => write!(f, "API response decode error: {}", msg),
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// === SummaryError ===

/// Errors surfaced by the summary workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryError {
    /// Both the lookup and the generation path failed, or generation failed.
    Api(ApiError),
    /// The owning view was closed before the request finished.
    Cancelled,
}

impl SummaryError {
    pub fn user_message(&self) -> String {
        match self {
            SummaryError::Api(e) => e.user_message(),
            SummaryError::Cancelled => GENERIC_SUMMARY_FAILURE.to_string(),
        }
    }
}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryError::Api(e) => write!(f, "Summary request failed: {}", e),
            SummaryError::Cancelled => write!(f, "Summary request cancelled"),
        }
    }
}

impl std::error::Error for SummaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SummaryError::Api(e) => Some(e),
            SummaryError::Cancelled => None,
        }
    }
}

impl From<ApiError> for SummaryError {
    fn from(e: ApiError) -> Self {
        SummaryError::Api(e)
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
