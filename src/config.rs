use crate::constants::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};
use crate::fetcher::validate_day_format;
use crate::models::Credentials;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved configuration with all values filled in (no Options).
///
/// This struct represents the pipeline defaults and can be deserialized by the TOML
/// loader. All fields have concrete values, making it safe to access directly without unwrapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Directory holding daily and yearly CSV files
    pub output_dir: PathBuf,
    /// Root of the Enelogic REST API
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ResolvedConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks values that serde can't: a positive timeout and an absolute URL.
    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Request timeout must be greater than 0".into(),
            ));
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }
}

/// Configuration that can be loaded from a TOML file.
///
/// Deserializes the four account values and optional pipeline configuration.
/// The parser rejects unknown keys to catch typos.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedConfigFile {
    /// Enelogic account e-mail address
    pub username: String,
    /// Developer app id
    pub app_id: String,
    /// Developer app secret
    pub app_secret: String,
    /// Per-user API key
    pub api_key: String,
    /// First day to fetch (`YYYY-MM-DD`, inclusive)
    #[serde(default)]
    pub start: Option<String>,
    /// Day to stop before (`YYYY-MM-DD`, exclusive)
    #[serde(default)]
    pub end: Option<String>,
    /// Whether to rebuild yearly bundles after fetching (defaults to `true`)
    #[serde(default = "default_bundle")]
    pub bundle: bool,
    /// Flattened resolved configuration with pipeline defaults
    #[serde(flatten)]
    pub resolved: ResolvedConfig,
}

impl ResolvedConfigFile {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, required fields are missing,
    /// unknown keys are present, a day is not `YYYY-MM-DD`, or the timeout is zero.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: ResolvedConfigFile = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        config.resolved.validate()?;
        for day in [&config.start, &config.end].into_iter().flatten() {
            validate_day_format(day)?;
        }

        Ok(config)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.app_id, &self.app_secret, &self.api_key)
    }
}

fn default_bundle() -> bool {
    true
}
