//! Error types for sweep.
//!
//! Every fallible library call returns [`Result`]. Pipeline stages never
//! propagate these to the caller; they log them and drop the failing item.

use thiserror::Error;


/// Main error type for sweep operations.
#[derive(Error, Debug)]
pub enum SweepError {
    /// Network-related errors (connection, timeout, DNS)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication errors (401, 403)
    #[error("Authentication error (status: {status_code:?}): {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
    },

    /// Resource not found errors (404)
    #[error("{resource_type} not found: {name}")]
    NotFound { resource_type: String, name: String },

    /// Rate limiting errors (429)
    #[error("Rate limit: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Server errors (5xx)
    #[error("Server error (status: {status_code}): {message}")]
    Server { message: String, status_code: u16 },

    /// Errors reported by the registry in its JSON error envelope
    #[error("Registry error (status: {status_code}): {}", .errors.join("; "))]
    Registry {
        status_code: u16,
        /// Each entry is rendered as `CODE - message`
        errors: Vec<String>,
    },

    /// Validation errors (malformed manifest, digest mismatch, bad input)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, missing settings)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;

impl SweepError {
    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::error::SweepError;
    ///
    /// let err = SweepError::network("connection refused");
    /// assert!(matches!(err, SweepError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error wrapping the underlying cause.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new authentication error.
    pub fn authentication<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::Authentication {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::error::SweepError;
    ///
    /// let err = SweepError::not_found("manifest", "webserver:rc2");
    /// assert_eq!(err.to_string(), "manifest not found: webserver:rc2");
    /// ```
    pub fn not_found<S: Into<String>>(resource_type: S, name: S) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Creates a new rate limit error.
    pub fn rate_limit<S: Into<String>>(message: S, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Creates a new server error.
    pub fn server<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::Server {
            message: message.into(),
            status_code,
        }
    }

    /// Creates an error from the registry's `errors` envelope.
    pub fn registry(status_code: u16, errors: Vec<String>) -> Self {
        Self::Registry {
            status_code,
            errors,
        }
    }

    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsweep::error::SweepError;
    ///
    /// let err = SweepError::validation("manifest has no history");
    /// assert!(matches!(err, SweepError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error wrapping the underlying cause.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S, path: Option<S>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error wrapping the underlying cause.
    pub fn config_with_source<S, E>(message: S, path: Option<S>, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { status_code, .. } => *status_code,
            Self::Server { status_code, .. } | Self::Registry { status_code, .. } => {
                Some(*status_code)
            }
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for SweepError {
    fn from(e: config::ConfigError) -> Self {
        SweepError::config_with_source("Failed to build configuration", None::<&str>, e)
    }
}
