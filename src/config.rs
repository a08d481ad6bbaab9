//! Server configuration
//!
//! Built once at startup from flags, environment variables and `.env`,
//! then passed by reference to whatever needs it.

use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
/// Mount point of the MCP endpoint
pub const MCP_PATH: &str = "/mcp";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TIMEZONE: &str = "Europe/Lisbon";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
const MAX_UPSTREAM_TIMEOUT_SECS: u64 = 300;

pub const OPEN_METEO_MARINE_URL: &str = "https://marine-api.open-meteo.com/v1";
pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1";
pub const STORMGLASS_URL: &str = "https://api.stormglass.io/v2";

/// Carcavelos - tide reference point for the Lisbon coast
pub const TIDE_LATITUDE: f64 = 38.6756;
pub const TIDE_LONGITUDE: f64 = -9.3378;

pub const API_KEY_ENV: &str = "STORMGLASS_API_KEY";

/// Upstream data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Free Open-Meteo marine + forecast APIs
    OpenMeteo,
    /// Paid Stormglass API, needs `STORMGLASS_API_KEY`
    Stormglass,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenMeteo => write!(f, "open-meteo"),
            ProviderKind::Stormglass => write!(f, "stormglass"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "surf-mcp")]
#[command(version)]
#[command(about = "MCP server exposing surf forecast tools (waves, wind, tides)")]
pub struct ServerConfig {
    /// Transport type
    #[arg(long, value_enum, env = "SURF_TRANSPORT", default_value = "http")]
    pub transport: Transport,

    /// Bind address for HTTP transport
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port for HTTP transport
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// URL agents use to reach this server (logged at startup)
    #[arg(long, env = "MCP_SERVER_URL")]
    pub public_url: Option<String>,

    /// Upstream data provider
    #[arg(long, value_enum, env = "SURF_PROVIDER", default_value = "open-meteo")]
    pub provider: ProviderKind,

    /// Stormglass API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory holding surf-spots.json and surf-preferences.json
    #[arg(long, env = "SURF_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// IANA time zone used to anchor week-ahead windows
    #[arg(long, env = "SURF_TIMEZONE", default_value = DEFAULT_TIMEZONE, value_parser = parse_timezone)]
    pub timezone: Tz,

    /// Timeout for each upstream request
    #[arg(long, env = "SURF_UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,

    #[arg(long, env = "SURF_TIDE_LATITUDE", default_value_t = TIDE_LATITUDE, allow_negative_numbers = true)]
    pub tide_latitude: f64,

    #[arg(long, env = "SURF_TIDE_LONGITUDE", default_value_t = TIDE_LONGITUDE, allow_negative_numbers = true)]
    pub tide_longitude: f64,

    #[arg(long, env = "OPEN_METEO_MARINE_URL", default_value = OPEN_METEO_MARINE_URL)]
    pub marine_url: String,

    #[arg(long, env = "OPEN_METEO_FORECAST_URL", default_value = OPEN_METEO_FORECAST_URL)]
    pub forecast_url: String,

    #[arg(long, env = "STORMGLASS_URL", default_value = STORMGLASS_URL)]
    pub stormglass_url: String,

    /// Log output format
    #[arg(long, value_enum, env = "SURF_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,
}

fn parse_timezone(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>().map_err(|_| format!("Unknown time zone: {s}"))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Http,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            public_url: None,
            provider: ProviderKind::OpenMeteo,
            api_key: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timezone: chrono_tz::Europe::Lisbon,
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            tide_latitude: TIDE_LATITUDE,
            tide_longitude: TIDE_LONGITUDE,
            marine_url: OPEN_METEO_MARINE_URL.to_string(),
            forecast_url: OPEN_METEO_FORECAST_URL.to_string(),
            stormglass_url: STORMGLASS_URL.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Validate all settings; any failure here aborts startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider == ProviderKind::Stormglass {
            match self.api_key.as_deref().map(str::trim) {
                Some(key) if !key.is_empty() => {}
                _ => return Err(ConfigError::MissingEnv(API_KEY_ENV)),
            }
        }

        if self.upstream_timeout_secs == 0 || self.upstream_timeout_secs > MAX_UPSTREAM_TIMEOUT_SECS {
            return Err(ConfigError::invalid(format!(
                "Upstream timeout must be between 1 and {MAX_UPSTREAM_TIMEOUT_SECS} seconds"
            )));
        }

        if !(-90.0..=90.0).contains(&self.tide_latitude)
            || !(-180.0..=180.0).contains(&self.tide_longitude)
        {
            return Err(ConfigError::invalid(format!(
                "Tide region out of range: {}, {}",
                self.tide_latitude, self.tide_longitude
            )));
        }

        for (name, url) in [
            ("marine", &self.marine_url),
            ("forecast", &self.forecast_url),
            ("stormglass", &self.stormglass_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::invalid(format!(
                    "The {name} base URL must be an HTTP or HTTPS URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}{}", self.port, MCP_PATH))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
