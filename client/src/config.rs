use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::camera::Facing;
use crate::error::ConfigError;
use crate::submission::RacePolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PREDICT_PATH: &str = "/predict";

pub const ENV_BASE_URL: &str = "FOOD_API_URL";
pub const ENV_PREDICT_PATH: &str = "FOOD_API_PREDICT_PATH";
pub const ENV_TIMEOUT_SECS: &str = "FOOD_API_TIMEOUT_SECS";
pub const ENV_RACE_POLICY: &str = "FOOD_RACE_POLICY";
pub const ENV_CAMERA_FACING: &str = "FOOD_CAMERA_FACING";

const YAML_TIMEOUT_SECS: &str = "request_timeout_secs";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub predict_path: String,
    /// `None` leaves the transport's own default in place.
    pub request_timeout: Option<Duration>,
    pub race_policy: RacePolicy,
    pub default_facing: Facing,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
            request_timeout: None,
            race_policy: RacePolicy::default(),
            default_facing: Facing::default(),
        }
    }
}

/// On-disk form; every key is optional and overrides the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    predict_path: Option<String>,
    request_timeout_secs: Option<u64>,
    race_policy: Option<RacePolicy>,
    default_facing: Option<Facing>,
}

impl ClientConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::default().merge_yaml(&contents)
    }

    pub fn merge_yaml(mut self, contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(contents)?;

        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(predict_path) = file.predict_path {
            self.predict_path = predict_path;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Some(timeout_from_secs(YAML_TIMEOUT_SECS, secs, &secs.to_string())?);
        }
        if let Some(policy) = file.race_policy {
            self.race_policy = policy;
        }
        if let Some(facing) = file.default_facing {
            self.default_facing = facing;
        }

        self.endpoint()?;
        Ok(self)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `FOOD_*` overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(predict_path) = lookup(ENV_PREDICT_PATH) {
            self.predict_path = predict_path;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            self.request_timeout = Some(timeout_from_secs(ENV_TIMEOUT_SECS, secs, &raw)?);
        }
        if let Some(raw) = lookup(ENV_RACE_POLICY) {
            self.race_policy = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_RACE_POLICY,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(ENV_CAMERA_FACING) {
            self.default_facing = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_CAMERA_FACING,
                value: raw.clone(),
            })?;
        }

        self.endpoint()?;
        Ok(self)
    }

    /// Full URL of the recognition endpoint.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let base = self.base_url.trim_end_matches('/');
        let path = self.predict_path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }
}

fn timeout_from_secs(key: &'static str, secs: u64, raw: &str) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
