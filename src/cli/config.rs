//! Configuration file loading
//!
//! ```json
//! {
//!   "http": { "host": "127.0.0.1", "port": 8787, "cors_origins": [] },
//!   "password_policy": { "min_length": 10, "require_number": true },
//!   "feedback_max_length": 2000,
//!   "log_level": "INFO"
//! }
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::account::ServiceConfig;
use crate::http_server::HttpServerConfig;
use crate::observability::{Event, Logger, Severity};

/// formsync configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(flatten)]
    pub service: ServiceConfig,

    /// Lowest severity written to the log
    #[serde(default)]
    pub log_level: Severity,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Logger::event(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );

        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        if self.service.password_policy.min_length == 0 {
            return Err(CliError::config_error(
                "password_policy.min_length must be > 0",
            ));
        }

        if self.service.feedback_max_length == 0 {
            return Err(CliError::config_error("feedback_max_length must be > 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let file = write_config("{}");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.service.feedback_max_length, 2000);
    }

    #[test]
    fn test_overrides() {
        let file = write_config(
            r#"{
                "http": { "port": 9000 },
                "password_policy": { "min_length": 12, "require_number": true },
                "feedback_max_length": 500
            }"#,
        );
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.service.password_policy.min_length, 12);
        assert!(config.service.password_policy.require_number);
        assert!(!config.service.password_policy.require_uppercase);
        assert_eq!(config.service.feedback_max_length, 500);
        assert_eq!(config.log_level, Severity::Info);
    }

    #[test]
    fn test_log_level() {
        let file = write_config(r#"{"log_level": "TRACE"}"#);
        assert_eq!(Config::load(file.path()).unwrap().log_level, Severity::Trace);

        let file = write_config(r#"{"log_level": "LOUD"}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::ConfigError);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for content in [
            r#"{"http": {"port": 0}}"#,
            r#"{"password_policy": {"min_length": 0}}"#,
            r#"{"feedback_max_length": 0}"#,
            "not json",
        ] {
            let file = write_config(content);
            let err = Config::load(file.path()).unwrap_err();
            assert_eq!(err.code(), CliErrorCode::ConfigError, "{}", content);
        }
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/formsync.json")).unwrap_err();
        assert!(err.message().starts_with("Failed to read config"));
    }

    #[test]
    fn test_load_or_default_without_path() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
