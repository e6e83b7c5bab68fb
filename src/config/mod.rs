use crate::core::clock::{TICK_INTERVAL_MS, WORKDAY_MS};
use crate::errors::{AppError, AppResult};
use crate::models::location::{ALTERNATE_RADIUS_METERS, DEFAULT_RADIUS_METERS};
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_duration_ms;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Longest accepted workday target: one day.
pub const MAX_WORKDAY_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: String,
    pub workday_target: String,
    pub default_radius: f64,
    pub alternate_radius: f64,
    pub tick_interval_ms: u64,
    pub high_accuracy: bool,
    pub max_sample_age_ms: u64,
    pub sample_timeout_ms: u64,
    pub notifications: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            workday_target: "9h".to_string(),
            default_radius: DEFAULT_RADIUS_METERS,
            alternate_radius: ALTERNATE_RADIUS_METERS,
            tick_interval_ms: TICK_INTERVAL_MS,
            high_accuracy: true,
            max_sample_age_ms: 5_000,
            sample_timeout_ms: 20_000,
            notifications: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rofficetracker")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rofficetracker.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rofficetracker.sqlite")
    }

    /// Load configuration from the standard file, or return defaults if not found
    pub fn load() -> Self {
        Self::load_from(&Self::config_file())
    }

    /// Load configuration from `path`. A missing file yields the defaults; an
    /// unreadable one yields the defaults too, with a warning.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable configuration");
                Config::default()
            }
        }
    }

    /// Like [`Config::load`], but reports an unreadable file instead of
    /// replacing it with the defaults.
    pub fn try_load() -> AppResult<Self> {
        Self::try_load_from(&Self::config_file())
    }

    pub fn try_load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let cfg: Config = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }

    /// Workday target in milliseconds. An empty value means the 9h default;
    /// zero and anything above 24h are rejected.
    pub fn workday_target_ms(&self) -> AppResult<u64> {
        if self.workday_target.trim().is_empty() {
            return Ok(WORKDAY_MS);
        }
        let ms = parse_duration_ms(&self.workday_target)?;
        if ms == 0 {
            return Err(AppError::Config(format!(
                "workday_target must be positive, got '{}'",
                self.workday_target
            )));
        }
        if ms > MAX_WORKDAY_MS {
            return Err(AppError::Config(format!(
                "workday_target must not exceed 24h, got '{}'",
                self.workday_target
            )));
        }
        Ok(ms)
    }

    /// Resolve a database path: `~` is expanded, relative names are placed
    /// inside the config directory.
    pub fn resolve_database(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Initialize configuration and database location.
    /// Returns the database path to use. In test mode the config file is not written.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let db_path = match custom_db {
            Some(name) => Self::resolve_database(&name),
            None => Self::database_file(),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !is_test {
            fs::create_dir_all(Self::config_dir())?;

            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };

            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(db_path)
    }
}
