use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Labtrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_BIND_ADDR: &str = "LABTRACK_BIND_ADDR";
pub const ENV_DB_PATH: &str = "LABTRACK_DB_PATH";

/// `LABTRACK_DB_PATH` value that selects an in-memory database.
pub const MEMORY_DB: &str = ":memory:";

const DEFAULT_PORT: u16 = 3000;

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,labtrack=debug"
}

/// Get the application data directory (`<platform data dir>/Labtrack/`).
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}

/// Default location of the records database.
pub fn default_db_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("records.db"))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not a valid socket address: {value}")]
    InvalidBindAddr { key: &'static str, value: String },
    #[error("{key} must not be empty")]
    Empty { key: &'static str },
    #[error("No data directory available; set {key}")]
    NoDataDir { key: &'static str },
}

/// Where the records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    Memory,
}

/// Process configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub db: DbLocation,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_kv(&vars)
    }

    pub fn from_kv(kv: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_addr = match kv.get(ENV_BIND_ADDR) {
            None => SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            Some(raw) => raw
                .trim()
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidBindAddr {
                    key: ENV_BIND_ADDR,
                    value: raw.clone(),
                })?,
        };

        let db = match kv.get(ENV_DB_PATH).map(|raw| raw.trim()) {
            Some("") => return Err(ConfigError::Empty { key: ENV_DB_PATH }),
            Some(MEMORY_DB) => DbLocation::Memory,
            Some(path) => DbLocation::File(PathBuf::from(path)),
            None => DbLocation::File(
                default_db_path().ok_or(ConfigError::NoDataDir { key: ENV_DB_PATH })?,
            ),
        };

        Ok(Self { bind_addr, db })
    }
}
