use crate::auth::password::hash_password;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Action labels for new events. Older databases hold "Anmeldung" and
    /// "Abmeldung"; `log` colors those too, so set these to keep them uniform.
    #[serde(default = "default_check_in_label")]
    pub check_in_label: String,
    #[serde(default = "default_check_out_label")]
    pub check_out_label: String,
    /// username → argon2 PHC string
    #[serde(default)]
    pub accounts: BTreeMap<String, String>,
    #[serde(default)]
    pub roster: RosterConfig,
}

/// WebUntis connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_check_in_label() -> String {
    "check-in".to_string()
}
fn default_check_out_label() -> String {
    "check-out".to_string()
}
fn default_server() -> String {
    "ajax.webuntis.com".to_string()
}
fn default_user_agent() -> String {
    "WebUntis".to_string()
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_attempts() -> u32 {
    3
}
fn default_backoff_ms() -> u64 {
    600
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            school: String::new(),
            username: String::new(),
            password: String::new(),
            user_agent: default_user_agent(),
            cache_ttl_secs: default_cache_ttl(),
            attempts: default_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RosterConfig {
    pub fn is_configured(&self) -> bool {
        !self.school.trim().is_empty() && !self.username.trim().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            check_in_label: default_check_in_label(),
            check_out_label: default_check_out_label(),
            accounts: BTreeMap::new(),
            roster: RosterConfig::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        let base = if cfg!(target_os = "windows") {
            dirs::config_dir()
        } else {
            dirs::home_dir()
        };
        let base = base.unwrap_or_else(|| PathBuf::from("."));

        if cfg!(target_os = "windows") {
            base.join("rattendance")
        } else {
            base.join(".rattendance")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    /// Path of the roster cache file
    pub fn roster_cache_file() -> PathBuf {
        Self::config_dir().join("roster_cache.json")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Resolve a `--db` name: absolute, or relative to the config directory.
    fn resolve_database(name: &str) -> PathBuf {
        let p = Path::new(name);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Fill in what `init` owns on top of an already loaded configuration.
    ///
    /// The database path changes only when `custom_db` is given. The `admin`
    /// hash is written only while no account exists, so re-running `init`
    /// never replaces credentials. Returns whether the admin account was created.
    pub fn apply_init(&mut self, custom_db: Option<&str>, admin_password: &str) -> AppResult<bool> {
        if let Some(name) = custom_db {
            self.database = Self::resolve_database(name).to_string_lossy().to_string();
        }

        if !self.accounts.is_empty() {
            return Ok(false);
        }

        self.accounts
            .insert("admin".to_string(), hash_password(admin_password)?);
        Ok(true)
    }
}
