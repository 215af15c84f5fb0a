//! Configuration loading
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is never fatal. A config file that exists but does
//! not parse is reported, since silently ignoring it would hide typos.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3456;

/// Default bind address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default database file, relative to the working directory
pub const DEFAULT_DATABASE: &str = "database.db";

/// Default geocoding endpoint (Google Geocoding API, JSON output)
pub const DEFAULT_GEOCODER_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Default reference point for location sorting (Zagreb city centre)
pub const DEFAULT_LATITUDE: f64 = 45.815;
pub const DEFAULT_LONGITUDE: f64 = 15.9819;

/// Environment variable names
pub const ENV_PORT: &str = "PORT";
pub const ENV_DATABASE: &str = "DB";
pub const ENV_CONFIG: &str = "EVCAT_CONFIG";
pub const ENV_GEOCODER_API_KEY: &str = "GEOCODER_API_KEY";

/// Geocoding collaborator settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeocoderConfig {
    /// API key; geocoding is disabled when absent
    pub api_key: Option<String>,
    /// Endpoint accepting `address` and `key` query parameters
    pub base_url: String,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum number of in-flight geocode calls per search request
    pub concurrency: usize,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEOCODER_URL.to_string(),
            timeout_ms: 5000,
            concurrency: 8,
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub default_latitude: f64,
    pub default_longitude: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
        }
    }
}

/// Contents of the TOML config file. All keys are optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub geocoder: GeocoderConfig,
    pub search: SearchConfig,
}

/// Values supplied on the command line (priority 1)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub geocoder_api_key: Option<String>,
}

impl ConfigOverrides {
    /// Fill every unset field from its environment variable (priority 2)
    pub fn with_env(mut self) -> Self {
        if self.port.is_none() {
            self.port = std::env::var(ENV_PORT).ok().and_then(|p| p.parse().ok());
        }
        if self.database_path.is_none() {
            self.database_path = std::env::var(ENV_DATABASE).ok().map(PathBuf::from);
        }
        if self.config_file.is_none() {
            self.config_file = std::env::var(ENV_CONFIG).ok().map(PathBuf::from);
        }
        if self.geocoder_api_key.is_none() {
            self.geocoder_api_key = std::env::var(ENV_GEOCODER_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty());
        }
        self
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub geocoder: GeocoderConfig,
    pub search: SearchConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::resolve(ConfigOverrides::default(), TomlConfig::default())
    }
}

impl ServiceConfig {
    /// Merge overrides (CLI + environment) over file values over defaults
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        let mut geocoder = file.geocoder;
        if overrides.geocoder_api_key.is_some() {
            geocoder.api_key = overrides.geocoder_api_key;
        }
        geocoder.concurrency = geocoder.concurrency.max(1);

        Self {
            bind_address: file
                .bind_address
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            geocoder,
            search: file.search,
        }
    }

    /// Load configuration from overrides, environment and config file
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let overrides = overrides.with_env();
        let file = load_toml_config(overrides.config_file.as_deref())?;
        Ok(Self::resolve(overrides, file))
    }
}

/// Parse TOML config content
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
}

/// Load the TOML config file
///
/// An explicit path must exist. Without one, the platform locations are
/// probed and built-in defaults are used when none is found.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match locate_config_file() {
            Some(path) => path,
            None => {
                debug!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = parse_toml_config(&content)?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Probe `<user config dir>/evcat/config.toml`, then `/etc/evcat/config.toml`
fn locate_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("evcat").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/evcat/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
