use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_PATH_ENV: &str = "FLIGHT_DASHBOARD_CONFIG";
/// Environment variable overriding the dataset path.
pub const DATA_PATH_ENV: &str = "FLIGHT_DASHBOARD_DATA";

pub const DEFAULT_CONFIG_FILE: &str = "flight-dashboard.json";
pub const DEFAULT_DATA_FILE: &str = "Flight_delay_final.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Startup settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Flight table loaded at startup.
    pub data_path: PathBuf,
    pub window_width: f32,
    pub window_height: f32,
    /// Rows shown in the filtered-records preview grid.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            window_width: 1400.0,
            window_height: 900.0,
            preview_rows: 200,
        }
    }
}

impl DashboardConfig {
    /// Resolve the config from the environment: the file named by
    /// [`CONFIG_PATH_ENV`] (or [`DEFAULT_CONFIG_FILE`] when present), then
    /// [`DATA_PATH_ENV`] on top.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        if let Some(data) = std::env::var_os(DATA_PATH_ENV) {
            config.data_path = PathBuf::from(data);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = DashboardConfig::from_json(r#"{"data_path": "flights.parquet"}"#).unwrap();
        assert_eq!(cfg.data_path, PathBuf::from("flights.parquet"));
        assert_eq!(cfg.preview_rows, DashboardConfig::default().preview_rows);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(DashboardConfig::from_json(r#"{"data_pth": "x.csv"}"#).is_err());
    }

    #[test]
    fn file_errors_name_the_path() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "not json").unwrap();
        let err = DashboardConfig::from_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&tmp.path().display().to_string()));
    }
}
