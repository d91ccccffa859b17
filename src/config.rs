//! Environment configuration for the store and the host shell

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::state::GameStore;
use crate::storage::FileStore;
use crate::types::DEFAULT_STATE_KEY;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIR: &str = "static";

fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn valid_key(key: &str) -> bool {
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Where the game state lives on disk
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub state_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            state_key: DEFAULT_STATE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Read BADSHAH_DATA_DIR and BADSHAH_STATE_KEY
    pub fn from_env() -> Self {
        let data_dir = env_trimmed("BADSHAH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let state_key = match env_trimmed("BADSHAH_STATE_KEY") {
            Some(key) if valid_key(&key) => key,
            Some(key) => {
                tracing::warn!(
                    "BADSHAH_STATE_KEY '{}' may only contain letters, digits, '_' and '-', using '{}'",
                    key,
                    DEFAULT_STATE_KEY
                );
                DEFAULT_STATE_KEY.to_string()
            }
            None => DEFAULT_STATE_KEY.to_string(),
        };

        tracing::info!(
            data_dir = %data_dir.display(),
            state_key = %state_key,
            "Store config loaded"
        );

        Self {
            data_dir,
            state_key,
        }
    }

    /// Open the file-backed store and rehydrate it
    pub fn build_store(&self) -> GameStore {
        let storage = FileStore::new(self.data_dir.clone());
        GameStore::load(Box::new(storage), self.state_key.clone())
    }
}

/// Host shell settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Read BADSHAH_BIND_ADDR and BADSHAH_STATIC_DIR
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = match env_trimmed("BADSHAH_BIND_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(
                    "Invalid BADSHAH_BIND_ADDR '{}': {}, using {}",
                    raw,
                    e,
                    DEFAULT_BIND_ADDR
                );
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let static_dir = env_trimmed("BADSHAH_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        Self {
            bind_addr,
            static_dir,
        }
    }
}
