use std::collections::HashMap;

/// The main error type for apto-client operations.
#[derive(Debug, thiserror::Error)]
pub enum AptoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Too many requests: {0}")]
    TooManyRequests(String),
}

/// Error context for additional error information
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: Option<String>,
    /// Additional error details
    pub details: Option<String>,
    /// Contextual key-value pairs
    pub context: HashMap<String, String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_id(mut self, id: impl Into<String>) -> Self {
        self.error_id = Some(id.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details = Some(detail.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Error with attached context
///
/// This type allows attaching context to an AptoError while still
/// being usable as an AptoError via the `Into` trait.
#[derive(Debug)]
pub struct ErrorWithContext {
    error: AptoError,
    context: ErrorContext,
}

impl ErrorWithContext {
    /// Create a new error with context
    pub fn new(error: AptoError, context: ErrorContext) -> Self {
        Self { error, context }
    }

    /// Get a reference to the underlying error
    pub fn error(&self) -> &AptoError {
        &self.error
    }

    /// Get a reference to the context
    pub fn context(&self) -> &ErrorContext {
        &self.context
    }
}

impl std::fmt::Display for ErrorWithContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(ref details) = self.context.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorWithContext {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<ErrorWithContext> for AptoError {
    fn from(err: ErrorWithContext) -> Self {
        err.error
    }
}

impl AptoError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn request_timeout() -> Self {
        Self::RequestTimeout
    }

    pub fn too_many_requests(msg: impl Into<String>) -> Self {
        Self::TooManyRequests(msg.into())
    }

    /// Add context to this error, returning an ErrorWithContext
    pub fn with_context(self, context: ErrorContext) -> ErrorWithContext {
        ErrorWithContext::new(self, context)
    }

    /// Check if this error represents a failure of the caller's input
    /// rather than of the backend or the transport.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::BadRequest(_)
                | Self::Unauthorized(_)
                | Self::Forbidden(_)
                | Self::TooManyRequests(_)
        )
    }
}

/// Result type alias for apto-client operations
pub type Result<T> = std::result::Result<T, AptoError>;

// Common error type conversions

impl From<serde_json::Error> for AptoError {
    fn from(err: serde_json::Error) -> Self {
        // Classify based on error category
        if err.is_data() || err.is_syntax() || err.is_eof() {
            AptoError::BadRequest(format!("JSON error: {}", err))
        } else {
            // IO errors are internal
            AptoError::Internal(format!("JSON serialization error: {}", err))
        }
    }
}

impl From<reqwest::Error> for AptoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AptoError::RequestTimeout
        } else if err.is_connect() {
            AptoError::ServiceUnavailable(format!("Connection error: {}", err))
        } else if err.is_status() {
            // Map HTTP status codes from the platform API
            if let Some(status) = err.status() {
                match status.as_u16() {
                    401 => AptoError::Unauthorized("API authentication failed".to_string()),
                    403 => AptoError::Forbidden("API access denied".to_string()),
                    404 => AptoError::NotFound("API resource not found".to_string()),
                    429 => AptoError::TooManyRequests("API rate limit exceeded".to_string()),
                    503 => AptoError::ServiceUnavailable("API unavailable".to_string()),
                    _ => AptoError::Internal(format!("API error: {}", err)),
                }
            } else {
                AptoError::Internal(format!("HTTP error: {}", err))
            }
        } else {
            AptoError::Internal(format!("Request error: {}", err))
        }
    }
}

impl From<url::ParseError> for AptoError {
    fn from(err: url::ParseError) -> Self {
        AptoError::BadRequest(format!("Invalid URL: {}", err))
    }
}
