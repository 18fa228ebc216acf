use serde::Deserialize;
use std::fs::File;
use std::path::Path;

fn default_base_url() -> String {
    "https://api.worldoftanks.eu/wot".into()
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct Upstream {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub application_id: Option<String>,
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            base_url: default_base_url(),
            application_id: None,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Deserialize, Debug)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub listener: Listener,
    #[serde(default)]
    pub upstream: Upstream,
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data = serde_yaml::from_reader(file)?;

        Ok(data)
    }

    /// Resolve the upstream credential once at startup. The `API_KEY`
    /// environment variable takes precedence over the config file.
    pub fn credential(&self) -> Result<String, ConfigError> {
        self.credential_from(std::env::var("API_KEY").ok())
    }

    fn credential_from(&self, env_key: Option<String>) -> Result<String, ConfigError> {
        match env_key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => self
                .upstream
                .application_id
                .clone()
                .ok_or(ConfigError::MissingCredential),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("no upstream credential: set upstream.application_id or the API_KEY environment variable")]
    MissingCredential,
}
