use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    /// Transport timeout; `None` leaves requests unbounded.
    pub http_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("COMPLAINT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let http_timeout = match lookup("HTTP_TIMEOUT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                humantime::parse_duration(raw.trim())
                    .map_err(|e| ConfigError::InvalidEnvVar("HTTP_TIMEOUT".to_string(), e.to_string()))?,
            ),
            None => None,
        };

        let user_agent = lookup("HTTP_USER_AGENT").unwrap_or_else(default_user_agent);

        let config = Config {
            api_url,
            http_timeout,
            user_agent,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidEnvVar("COMPLAINT_API_URL".to_string(), "cannot be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar(
                "COMPLAINT_API_URL".to_string(),
                format!("expected an http(s) URL, got {}", url),
            ));
        }
        if self.http_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidEnvVar("HTTP_TIMEOUT".to_string(), "must be greater than zero".to_string()));
        }
        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("complaint-desk/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}
