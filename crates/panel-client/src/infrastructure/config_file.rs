//! TOML configuration file loading.
//!
//! The file is optional and may be partial: every [`PanelConfig`] field has a
//! serde default, so a file that only sets `server_url` is valid.  Command-line
//! flags are applied on top of whatever this module returns (see `main.rs`).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::config::PanelConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read (a path named explicitly
/// must exist), [`ConfigError::Parse`] if it is not valid config TOML.
pub fn load_config(path: &Path) -> Result<PanelConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parses config TOML text.
pub fn parse_config(content: &str) -> Result<PanelConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), PanelConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        // Arrange
        let toml = r#"
            server_url = "ws://10.0.0.5:5001/socket.io/?EIO=4&transport=websocket"

            [keyboard]
            compensation_delay_ms = 250
        "#;

        // Act
        let cfg = parse_config(toml).unwrap();

        // Assert
        assert!(cfg.server_url.starts_with("ws://10.0.0.5"));
        assert_eq!(cfg.reconnect_delay_ms, 2000);
        assert_eq!(cfg.keyboard.compensation_delay_ms, 250);
        assert_eq!(cfg.keyboard.container_id, "virtual-keyboard-container");
    }

    #[test]
    fn test_wrong_type_is_a_parse_error() {
        let result = parse_config("reconnect_delay_ms = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error_naming_the_path() {
        let path = std::env::temp_dir().join("panel_client_no_such_config.toml");
        match load_config(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_config_reads_file_from_disk() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("panel_client_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("panel.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        // Act
        let cfg = load_config(&path).unwrap();

        // Assert
        assert_eq!(cfg.log_level, "debug");

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }
}
