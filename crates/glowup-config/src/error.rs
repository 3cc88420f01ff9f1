//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `${VAR}` referenced in the file but absent from the environment.
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value the engine cannot run with; `field` is the dotted TOML path.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_shows_path() {
        let err = ConfigError::NotFound(PathBuf::from("config/default.toml"));
        assert_eq!(err.to_string(), "Config file not found: config/default.toml");
    }

    #[test]
    fn test_read_error_keeps_source() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/glowup.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(err.to_string().contains("/etc/glowup.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_value_names_field() {
        let err = ConfigError::InvalidValue {
            field: "pricing.markup_rate".to_string(),
            message: "markup_rate must be in [0, 1)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for pricing.markup_rate: markup_rate must be in [0, 1)"
        );
    }
}
