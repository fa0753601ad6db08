use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Refresh cadence of the elapsed-time display, in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Extra attempts for a failed shift write. 0 = fire-and-forget.
    #[serde(default)]
    pub write_retries: u32,
    #[serde(default = "default_write_backoff")]
    pub write_backoff_ms: u64,
    /// Whole weeks of history kept before the current one. None keeps everything.
    #[serde(default)]
    pub retention_weeks: Option<u32>,
    #[serde(default)]
    pub show_weekend: bool,
    #[serde(default = "default_placeholder")]
    pub empty_day_placeholder: String,
}

/// Upper bound for the delay between write attempts.
const MAX_WRITE_BACKOFF_MS: u64 = 60_000;

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_tick_interval() -> u64 {
    1000
}
fn default_write_backoff() -> u64 {
    200
}
fn default_placeholder() -> String {
    "00:00 - 00:00".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            tick_interval_ms: default_tick_interval(),
            write_retries: 0,
            write_backoff_ms: default_write_backoff(),
            retention_weeks: None,
            show_weekend: false,
            empty_day_placeholder: default_placeholder(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rshiftclock")
        } else {
            let home = dirs::home_dir()
                .or_else(|| env::var("HOME").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            home.join(".rshiftclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rshiftclock.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rshiftclock.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            Self::from_yaml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> AppResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(AppError::Config(
                "tick_interval_ms must be greater than zero".into(),
            ));
        }
        if self.write_backoff_ms > MAX_WRITE_BACKOFF_MS {
            return Err(AppError::Config(format!(
                "write_backoff_ms must not exceed {}",
                MAX_WRITE_BACKOFF_MS
            )));
        }
        if self.database.trim().is_empty() {
            return Err(AppError::Config("database path is empty".into()));
        }
        Ok(())
    }

    /// Database path with `~/` expanded.
    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn write_backoff(&self) -> Duration {
        Duration::from_millis(self.write_backoff_ms)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg = Config::from_yaml("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.tick_interval_ms, 1000);
        assert_eq!(cfg.write_retries, 0);
        assert_eq!(cfg.retention_weeks, None);
        assert!(!cfg.show_weekend);
        assert_eq!(cfg.empty_day_placeholder, "00:00 - 00:00");
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let err = Config::from_yaml("database: a.sqlite\ntick_interval_ms: 0\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn oversized_backoff_is_rejected() {
        let err = Config::from_yaml("write_backoff_ms: 18446744073709551615\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(Config::from_yaml("write_backoff_ms: 60000\n").is_ok());
    }

    #[test]
    fn yaml_round_trip_keeps_values() {
        let cfg = Config {
            database: "/data/shifts.sqlite".into(),
            write_retries: 3,
            retention_weeks: Some(8),
            show_weekend: true,
            ..Config::default()
        };
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), cfg);
    }
}
