//! Error types for the Spotify now-playing handler.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! None of these messages are shown to chat users; handlers reply with fixed texts.

use std::time::Duration;

/// Errors from the Spotify HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Access token rejected (401 response)
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message from API
        message: String,
    },

    /// Rate limited by Spotify (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time; never acted upon, calls are not retried
        retry_after: Duration,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// The OAuth redirect could not be turned into a token request
    #[error("Invalid authorization callback: {0}")]
    Callback(String),

    /// Token expired and there is no refresh token to renew it
    #[error("Access token expired and no refresh token is available")]
    MissingRefreshToken,

    /// A configured base URL could not be parsed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create a callback error.
    #[must_use]
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback(message.into())
    }
}

/// Errors from the key/value store and record codec.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// A stored record could not be decoded
    #[error("Failed to decode record at {key}: {source}")]
    Decode {
        /// Key of the malformed record
        key: String,
        /// Underlying decode error
        source: serde_json::Error,
    },

    /// A record could not be encoded
    #[error("Failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    /// A database statement or commit failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The schema could not be brought up to date
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Errors raised while handling one inbound message.
#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    /// A required request parameter was absent
    #[error("Missing required parameter '{name}'")]
    MissingParameter {
        /// Parameter name
        name: &'static str,
    },

    /// No pending authorization exists for the state id
    #[error("Unknown authorization state {state_id}")]
    UnknownState {
        /// State id from the request
        state_id: String,
    },

    /// The pending authorization expired before the callback arrived
    #[error("Received expired auth request for state {state_id}")]
    ExpiredState {
        /// State id from the request
        state_id: String,
    },

    /// Store failure (decode or persistence)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Spotify call failure
    #[error("Spotify error: {0}")]
    External(#[from] ClientError),
}

impl HandlerError {
    /// Create a missing parameter error.
    #[must_use]
    pub const fn missing_parameter(name: &'static str) -> Self {
        Self::MissingParameter { name }
    }

    /// Short machine-readable kind for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "missing_parameter",
            Self::UnknownState { .. } => "unknown_state",
            Self::ExpiredState { .. } => "expired_state",
            Self::Store(StoreError::Decode { .. }) => "decode",
            Self::Store(_) => "persistence",
            Self::External(_) => "external",
        }
    }
}

/// Errors from the handler registration table and message dispatch.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A handler was registered with an empty name
    #[error("Handler name must not be empty")]
    EmptyName,

    /// Two handlers of the same kind share a name
    #[error("Duplicate handler name '{0}'")]
    Duplicate(String),

    /// No handler with this name is registered
    #[error("No handler registered for '{0}'")]
    Unknown(String),

    /// The handler loop is not accepting messages (stopped or backlogged)
    #[error("Handler '{0}' is not accepting messages")]
    Unavailable(String),
}

/// Errors from delivering a reply to the chat platform.
#[derive(thiserror::Error, Debug)]
pub enum ReplyError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Chat platform rejected the reply
    #[error("Reply rejected with status {0}")]
    Rejected(u16),

    /// No reply destination is known
    #[error("Reply destination is empty")]
    NoDestination,
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;
