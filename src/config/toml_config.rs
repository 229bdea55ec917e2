use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RosterError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub timings: TimingsConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub first_name_url: String,
    pub last_name_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/referees".to_string(),
            first_name_url: "http://localhost:3000/referees?firstName=".to_string(),
            last_name_url: "http://localhost:3000/referees?lastName=".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    pub search_debounce_ms: u64,
    pub team_debounce_ms: u64,
    pub rating_debounce_ms: u64,
    pub filter_debounce_ms: u64,
    pub unlock_delay_ms: u64,
    /// Discard a half-filled rating form after this long. Absent means the
    /// form waits for its missing fields indefinitely.
    pub form_timeout_ms: Option<u64>,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            team_debounce_ms: 1000,
            rating_debounce_ms: 500,
            filter_debounce_ms: 100,
            unlock_delay_ms: 3000,
            form_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Render search results and post-write refreshes under the active
    /// filter instead of resetting to "all".
    pub preserve_filter: bool,
}

/// Resolved pipeline durations handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineTimings {
    pub search_debounce: Duration,
    pub team_debounce: Duration,
    pub rating_debounce: Duration,
    pub filter_debounce: Duration,
    pub unlock_delay: Duration,
    pub form_timeout: Option<Duration>,
}

impl Default for PipelineTimings {
    fn default() -> Self {
        TimingsConfig::default().to_timings()
    }
}

impl TimingsConfig {
    pub fn to_timings(&self) -> PipelineTimings {
        PipelineTimings {
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            team_debounce: Duration::from_millis(self.team_debounce_ms),
            rating_debounce: Duration::from_millis(self.rating_debounce_ms),
            filter_debounce: Duration::from_millis(self.filter_debounce_ms),
            unlock_delay: Duration::from_millis(self.unlock_delay_ms),
            form_timeout: self.form_timeout_ms.map(Duration::from_millis),
        }
    }
}

impl RosterConfig {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RosterError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RosterError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value, leaving unknown
    /// variables untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RosterError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timings(&self) -> PipelineTimings {
        self.timings.to_timings()
    }

    pub fn preserve_filter(&self) -> bool {
        self.refresh.preserve_filter
    }
}

impl ConfigProvider for RosterConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn first_name_url(&self) -> &str {
        &self.api.first_name_url
    }

    fn last_name_url(&self) -> &str {
        &self.api.last_name_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }
}

impl Validate for RosterConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_url("api.first_name_url", &self.api.first_name_url)?;
        validate_url("api.last_name_url", &self.api.last_name_url)?;
        validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 300)?;

        let t = &self.timings;
        validate_positive_number("timings.search_debounce_ms", t.search_debounce_ms, 1)?;
        validate_positive_number("timings.team_debounce_ms", t.team_debounce_ms, 1)?;
        validate_positive_number("timings.rating_debounce_ms", t.rating_debounce_ms, 1)?;
        validate_positive_number("timings.filter_debounce_ms", t.filter_debounce_ms, 1)?;
        if let Some(timeout) = t.form_timeout_ms {
            validate_positive_number("timings.form_timeout_ms", timeout, 1)?;
        }

        Ok(())
    }
}
