use crate::adapters::cookies;
use crate::domain::endpoints::Endpoints;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Origin only (scheme, host, port). Endpoint paths are absolute.
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Raw `Cookie` header value, e.g. `csrftoken=...; sessionid=...`.
    pub cookie: Option<String>,
    /// Overrides the token found in the `csrftoken` cookie.
    pub csrf_token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BookingError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BookingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// State-changing requests need the session cookie and a CSRF token.
    pub fn require_session(&self) -> Result<()> {
        validation::validate_required_field("auth.cookie", &self.cookie())?;
        validation::validate_required_field("auth.csrf_token", &self.csrf_token())?;
        Ok(())
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("server.base_url", &self.server.base_url)?;
        let base_url = url::Url::parse(&self.server.base_url)?;
        if base_url.path() != "/" {
            return Err(BookingError::InvalidConfigValueError {
                field: "server.base_url".to_string(),
                value: self.server.base_url.clone(),
                reason: "Base URL must be an origin without a path".to_string(),
            });
        }

        if let Some(timeout) = self.server.timeout_seconds {
            validation::validate_positive_number("server.timeout_seconds", timeout, 1)?;
        }

        for (field, path) in self.endpoints.iter() {
            validation::validate_endpoint_path(field, path)?;
        }

        if !self.endpoints.update_booking_status.contains("{booking_id}") {
            return Err(BookingError::InvalidConfigValueError {
                field: "endpoints.update_booking_status".to_string(),
                value: self.endpoints.update_booking_status.clone(),
                reason: "Path must contain the {booking_id} placeholder".to_string(),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for ClientConfig {
    fn base_url(&self) -> &str {
        &self.server.base_url
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.server
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn cookie(&self) -> Option<&str> {
        self.auth.cookie.as_deref().filter(|c| !c.trim().is_empty())
    }

    fn csrf_token(&self) -> Option<String> {
        self.auth
            .csrf_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.cookie().and_then(cookies::csrf_token_from_cookie_header))
    }

    fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}
