
use crate::cli::CliArgs;
use crate::error::{QuickshareError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tunnel: TunnelConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory to serve. If None, uses the current working directory.
    pub root: Option<PathBuf>,
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunnelConfig {
    /// Tunnel executable, either a bare name resolved via PATH or a full path.
    #[serde(default = "default_tunnel_binary")]
    pub binary: String,
    /// Extra arguments appended to the tunnel command line, shell-style.
    #[serde(default)]
    pub extra_args: String,
    #[serde(default = "default_scan_timeout_secs")]
    pub scan_timeout_secs: u64,
    /// Keep the local server running when the tunnel cannot be established.
    #[serde(default)]
    pub keep_serving_on_failure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_auto_open")]
    pub auto_open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default)]
    pub file_enabled: bool,
    pub file_path: Option<String>, // If None, uses default ~/.quickshare/logs/
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            root: None,
            ready_timeout_secs: default_ready_timeout_secs(),
        }
    }
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            binary: default_tunnel_binary(),
            extra_args: String::new(),
            scan_timeout_secs: default_scan_timeout_secs(),
            keep_serving_on_failure: false,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            auto_open: default_auto_open(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: false,
            file_path: None,
        }
    }
}

impl ServerConfig {
    pub fn root_dir(&self) -> PathBuf {
        match &self.root {
            Some(path) => path.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        let config_dir = get_config_dir()?;
        let config_path = config_dir.join("config.toml");
        Self::load_from_path(&config_path).await
    }

    /// Load from an explicit path if given, otherwise from the default
    /// location. An explicit path that does not exist is an error; the
    /// default location falls back to defaults when missing.
    pub async fn load_with_override(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(QuickshareError::ConfigError(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::load_from_path(path).await
            }
            None => Self::load().await,
        }
    }

    pub async fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            // Return default config if file doesn't exist
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tunnel.binary.trim().is_empty() {
            return Err(QuickshareError::ConfigError(
                "Tunnel binary must not be empty".to_string(),
            ));
        }

        if self.tunnel.scan_timeout_secs == 0 {
            return Err(QuickshareError::ConfigError(
                "Tunnel scan timeout must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(QuickshareError::ConfigError(format!(
                "Invalid logging level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Merge command-line overrides into the loaded configuration.
    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(dir) = &args.dir {
            self.server.root = Some(dir.clone());
        }
        if let Some(binary) = &args.tunnel_bin {
            self.tunnel.binary = binary.clone();
        }
        if let Some(timeout) = args.tunnel_timeout {
            self.tunnel.scan_timeout_secs = timeout;
        }
        if args.keep_serving {
            self.tunnel.keep_serving_on_failure = true;
        }
        if args.no_open {
            self.browser.auto_open = false;
        }
    }

    pub fn get_log_dir(&self) -> PathBuf {
        match &self.logging.file_path {
            Some(path) => PathBuf::from(path),
            None => {
                let config_dir = get_config_dir().unwrap_or_else(|_| PathBuf::from(".quickshare"));
                config_dir.join("logs")
            }
        }
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| {
            QuickshareError::ConfigError("Could not determine home directory".to_string())
        })?;

    Ok(PathBuf::from(home_dir).join(".quickshare"))
}

// Default value functions for serde
fn default_port() -> u16 {
    8000
}
fn default_ready_timeout_secs() -> u64 {
    5
}
fn default_tunnel_binary() -> String {
    "cloudflared".to_string()
}
fn default_scan_timeout_secs() -> u64 {
    30
}
fn default_auto_open() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
