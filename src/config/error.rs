//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
///
/// The only error class allowed to abort initialization (and with it the
/// render); everything downstream degrades instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when preparing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("public/minify"),
            Error::new(ErrorKind::PermissionDenied, "permission denied"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("public/minify"));

        let validation_err =
            ConfigError::Validation("minify_path must live under base_path".to_string());
        assert!(format!("{validation_err}").contains("minify_path"));
    }
}
