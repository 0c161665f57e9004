//! Node configuration types.

use crate::error::NodeError;
use crate::observability::LogFormat;
use confguard_github::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Prefix for environment overrides (e.g., `CONFGUARD_LOG_LEVEL`).
pub const ENV_PREFIX: &str = "CONFGUARD";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Configuration for the node.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct NodeConfig {
    /// HTTP listen address.
    pub listen_addr: SocketAddr,
    /// Base URL of the GitHub REST API.
    #[validate(url)]
    pub github_api_url: String,
    /// Log level.
    #[validate(custom(function = "validate_log_level"))]
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Timeout for each request to the repository service, in seconds.
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            github_api_url: DEFAULT_API_URL.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            request_timeout_secs: 30,
        }
    }
}

impl NodeConfig {
    /// Load configuration from an optional file and the environment.
    ///
    /// Values from `CONFGUARD_*` variables override the file; missing
    /// values fall back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, NodeError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        let config: NodeConfig = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Timeout for repository service requests.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("log_level")
            .with_message("expected one of trace, debug, info, warn, error".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = NodeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.github_api_url, "https://api.github.com");
    }

    #[test]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "listen_addr: \"0.0.0.0:9000\"\nlog_level: debug\nlog_format: json\nrequest_timeout_secs: 10"
        )
        .unwrap();

        let config = NodeConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.github_api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = NodeConfig::default();
        config.log_level = "loud".into();
        assert!(config.validate().is_err());

        let mut config = NodeConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = NodeConfig::default();
        config.github_api_url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_file_value_fails_load() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "request_timeout_secs: 0").unwrap();

        assert!(matches!(
            NodeConfig::load(Some(file.path())),
            Err(NodeError::InvalidConfig(_))
        ));
    }
}
