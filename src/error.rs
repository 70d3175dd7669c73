
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuickshareError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to bind port {port}: {source}")]
    BindError {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Tunnel binary not found: {}", .0.display())]
    BinaryNotFound(PathBuf),

    #[error("Failed to start tunnel process: {0}")]
    SpawnError(String),

    #[error("Tunnel process exited without announcing a public URL")]
    TunnelNotEstablished,

    #[error("No tunnel URL within {0} seconds")]
    TunnelTimeout(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<toml::de::Error> for QuickshareError {
    fn from(error: toml::de::Error) -> Self {
        QuickshareError::ConfigError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuickshareError>;
