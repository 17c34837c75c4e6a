use std::fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum ManapoolError {
    /// Well-formed HTTP response with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Caller input rejected before any request was sent.
    #[error("validation error on '{field}': {message}")]
    Validation {
        /// Name of the offending field or option.
        field: String,
        /// Human-readable reason.
        message: String,
    },
    /// Transport, cancellation, or body I/O failure. No usable HTTP response.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// A 2xx response body that is not valid JSON for the target type.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ManapoolError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the API error when this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status code for API errors.
    pub fn status(&self) -> Option<u16> {
        self.as_api().map(|err| err.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_not_found)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_unauthorized)
    }

    pub fn is_forbidden(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_forbidden)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_rate_limited)
    }

    pub fn is_server_error(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_server_error)
    }

    /// True when the call ended because its cancellation token fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Network(err) if err.is_cancelled())
    }
}

/// Non-success HTTP response.
///
/// `message` is the `error` (or `message`) field of a JSON error envelope
/// when the body carries one, and the raw body otherwise.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("api error {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// Failure that produced no usable HTTP response.
pub struct NetworkError {
    message: String,
    cancelled: bool,
    source: Option<BoxError>,
}

impl NetworkError {
    /// Wraps an underlying cause.
    pub fn new(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            cancelled: false,
            source: Some(source.into()),
        }
    }

    pub(crate) fn cancelled(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cancelled: true,
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// True when the underlying transport error was a timeout.
    pub fn is_timeout(&self) -> bool {
        self.source
            .as_deref()
            .and_then(|err| err.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout)
    }
}

impl fmt::Debug for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkError")
            .field("message", &self.message)
            .field("cancelled", &self.cancelled)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "network error: {}: {source}", self.message),
            None => write!(f, "network error: {}", self.message),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}
