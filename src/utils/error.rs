use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Server rejected request ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    ServerError {
        status: u16,
        message: Option<String>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Background task failed: {message}")]
    TaskError { message: String },

    #[error("{message}")]
    ActionFailed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Configuration,
    Validation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BookingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BookingError::ApiError(_) => ErrorCategory::Network,
            BookingError::ServerError { .. } | BookingError::ActionFailed { .. } => {
                ErrorCategory::Server
            }
            BookingError::ConfigError { .. }
            | BookingError::MissingConfigError { .. }
            | BookingError::InvalidConfigValueError { .. }
            | BookingError::ConfigValidationError { .. }
            | BookingError::UrlError(_) => ErrorCategory::Configuration,
            BookingError::ValidationError { .. } => ErrorCategory::Validation,
            BookingError::IoError(_)
            | BookingError::SerializationError(_)
            | BookingError::TaskError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Server => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BookingError::ApiError(e) if e.is_timeout() => {
                "The server did not answer in time; increase timeout_seconds or retry later"
            }
            BookingError::ApiError(_) => "Check that the booking server is reachable at base_url",
            BookingError::ServerError { status: 401 | 403, .. } => {
                "Sign in again and pass a fresh session cookie and CSRF token"
            }
            BookingError::ServerError { status: 404, .. } => {
                "The booking, service or master no longer exists; reload the lists"
            }
            BookingError::ServerError { .. } | BookingError::ActionFailed { .. } => {
                "Review the server message and retry the action"
            }
            BookingError::MissingConfigError { .. } => "Add the missing value to the config file or pass it as a flag",
            BookingError::InvalidConfigValueError { .. }
            | BookingError::ConfigValidationError { .. }
            | BookingError::ConfigError { .. }
            | BookingError::UrlError(_) => "Fix the configuration value and run again",
            BookingError::ValidationError { .. } => "Fill in every required field",
            BookingError::IoError(_) => "Check file paths and permissions",
            BookingError::SerializationError(_) => "The server answered with an unexpected payload",
            BookingError::TaskError { .. } => "Retry the action; report it if it keeps happening",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BookingError::ApiError(_) => "Could not reach the booking server".to_string(),
            BookingError::ServerError {
                message: Some(message),
                ..
            } => message.clone(),
            BookingError::ServerError { status, .. } => {
                format!("The booking server refused the request (HTTP {})", status)
            }
            other => other.to_string(),
        }
    }

    /// Server-provided error text, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BookingError::ServerError { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_prefers_server_text() {
        let err = BookingError::ServerError {
            status: 400,
            message: Some("This master is already booked at the selected time!".to_string()),
        };
        assert_eq!(
            err.user_friendly_message(),
            "This master is already booked at the selected time!"
        );
        assert_eq!(err.category(), ErrorCategory::Server);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_server_error_without_text() {
        let err = BookingError::ServerError {
            status: 500,
            message: None,
        };
        assert!(err.server_message().is_none());
        assert!(err.user_friendly_message().contains("500"));
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = BookingError::MissingConfigError {
            field: "server.base_url".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
