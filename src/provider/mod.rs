//! Upstream forecast providers
//!
//! Two providers:
//! - Open-Meteo: free marine + forecast APIs, daily aggregates
//! - Stormglass: paid point API, hourly values over next week's window

pub mod open_meteo;
pub mod stormglass;
pub mod window;

pub use open_meteo::OpenMeteo;
pub use stormglass::Stormglass;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::config::{ProviderKind, ServerConfig};
use crate::error::{ConfigError, ToolError};
use crate::normalize::require_marker;
use crate::upstream::{UpstreamClient, UpstreamRequest};

/// A point to forecast for, already validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Wave,
    Wind,
    Tide,
}

/// Forecast source - one method per capability
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Natural-language semantics of the payload: fields, units, hints
    fn description(&self, capability: Capability) -> &'static str;

    async fn wave_forecast(&self, at: Coordinates) -> Result<Value, ToolError>;

    async fn wind_forecast(&self, at: Coordinates) -> Result<Value, ToolError>;

    /// Tide for the configured region
    async fn tide_forecast(&self) -> Result<Value, ToolError>;
}

/// Issue `request` and check its marker
pub(crate) async fn execute(client: &UpstreamClient, request: UpstreamRequest) -> Result<Value, ToolError> {
    tracing::debug!(url = %request.url, marker = request.marker, "Upstream request");
    let body = client.fetch(&request).await?;
    require_marker(body, request.marker)
}

/// Build the provider selected by `config.provider`
pub fn from_config(config: &ServerConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let client = UpstreamClient::new(config.upstream_timeout())?;
    let provider: Arc<dyn Provider> = match config.provider {
        ProviderKind::OpenMeteo => Arc::new(OpenMeteo::new(client, config)),
        ProviderKind::Stormglass => {
            let key = config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .ok_or(ConfigError::MissingEnv(crate::config::API_KEY_ENV))?;
            Arc::new(Stormglass::new(client, config, key))
        }
    };
    tracing::info!(provider = %provider.kind(), "Forecast provider ready");
    Ok(provider)
}
