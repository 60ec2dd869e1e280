use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub http_server: HttpServerConfig,
}

/// Inbox and destination store locations
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Directory that receives dropped `.zip` archives.
    #[serde(default = "default_inbox_dir")]
    pub inbox_dir: PathBuf,
    /// Directory holding one sub-directory per ingested template.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            inbox_dir: default_inbox_dir(),
            store_dir: default_store_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Watch mode tuning
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Quiet window applied to raw notify events before a trigger is emitted.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Values given on the command line; `None` keeps what the config file says.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub inbox_dir: Option<PathBuf>,
    pub store_dir: Option<PathBuf>,
    pub debounce_ms: Option<u64>,
    pub port: Option<u16>,
}

fn default_inbox_dir() -> PathBuf {
    PathBuf::from("vault/inbox")
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("src/content/templates")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_http_port() -> u16 {
    4321
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in TPLVAULT_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (built-in defaults if absent)
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config = match std::env::var("TPLVAULT_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without validating it.
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.watch.debounce_ms == 0 {
            anyhow::bail!("watch.debounce_ms must be greater than 0");
        }

        if self.http_server.port == 0 {
            anyhow::bail!("http_server.port must be greater than 0");
        }

        if self.vault.inbox_dir == self.vault.store_dir {
            anyhow::bail!(
                "vault.inbox_dir and vault.store_dir must differ (both are {})",
                self.vault.inbox_dir.display()
            );
        }

        Ok(())
    }

    /// Apply command-line overrides, then re-validate the merged result.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<()> {
        if let Some(inbox) = overrides.inbox_dir {
            self.vault.inbox_dir = inbox;
        }
        if let Some(store) = overrides.store_dir {
            self.vault.store_dir = store;
        }
        if let Some(ms) = overrides.debounce_ms {
            self.watch.debounce_ms = ms;
        }
        if let Some(port) = overrides.port {
            self.http_server.port = port;
        }
        self.validate()
    }

    /// Get the inbox directory
    pub fn inbox_dir(&self) -> &Path {
        &self.vault.inbox_dir
    }

    /// Get the destination store directory
    pub fn store_dir(&self) -> &Path {
        &self.vault.store_dir
    }
}
