//! Open-Meteo marine + forecast APIs

use async_trait::async_trait;
use serde_json::Value;

use super::{execute, Capability, Coordinates, Provider};
use crate::config::{ProviderKind, ServerConfig};
use crate::error::ToolError;
use crate::upstream::{UpstreamClient, UpstreamRequest};

const MARKER: &str = "latitude";

const WAVE_DAILY: &str = "wave_height_max,wave_direction_dominant,wave_period_max";
const WIND_DAILY: &str = "wind_speed_10m_max,wind_gusts_10m_max,wind_direction_10m_dominant";
const TIDE_HOURLY: &str = "sea_level_height_msl";

const WAVE_DESCRIPTION: &str = "Get 7-day wave forecast for a surf spot.

Args:
    lat: Latitude (e.g., \"38.6756\")
    lng: Longitude (e.g., \"-9.3378\")

Returns: JSON with daily arrays (synchronized by index):
    - time: ISO8601 dates
    - wave_height_max: meters (m)
    - wave_direction_dominant: degrees (0°=N, clockwise)
    - wave_period_max: seconds (higher=better quality, 12-20s ideal)";

const WIND_DESCRIPTION: &str = "Get 7-day wind forecast for a surf spot.

Args:
    lat: Latitude (e.g., \"38.6756\")
    lng: Longitude (e.g., \"-9.3378\")

Returns: JSON with daily arrays (synchronized by index):
    - time: ISO8601 dates
    - wind_speed_10m_max: km/h (ideal <15, blown out >25)
    - wind_direction_10m_dominant: degrees (0°=N, wind FROM direction)
    - wind_gusts_10m_max: km/h

For Lisbon (west-facing): Offshore winds 90°-180° (ideal), Onshore 225°-315° (avoid).";

const TIDE_DESCRIPTION: &str = "Get hourly tide forecast for Lisbon (7 days).

Returns: JSON with hourly sea_level_height_msl in meters.
Low tide = powerful/close to shore. High tide = cleaner/further out.
Mid-incoming/outgoing often ideal.";

pub struct OpenMeteo {
    client: UpstreamClient,
    marine_url: String,
    forecast_url: String,
    tide_region: Coordinates,
}

impl OpenMeteo {
    pub fn new(client: UpstreamClient, config: &ServerConfig) -> Self {
        Self {
            client,
            marine_url: config.marine_url.trim_end_matches('/').to_string(),
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
            tide_region: Coordinates::new(config.tide_latitude, config.tide_longitude),
        }
    }

    pub fn wave_request(&self, at: Coordinates) -> UpstreamRequest {
        UpstreamRequest::get(format!("{}/marine", self.marine_url), MARKER)
            .param("latitude", at.latitude)
            .param("longitude", at.longitude)
            .param("daily", WAVE_DAILY)
    }

    pub fn wind_request(&self, at: Coordinates) -> UpstreamRequest {
        UpstreamRequest::get(format!("{}/forecast", self.forecast_url), MARKER)
            .param("latitude", at.latitude)
            .param("longitude", at.longitude)
            .param("daily", WIND_DAILY)
    }

    pub fn tide_request(&self) -> UpstreamRequest {
        UpstreamRequest::get(format!("{}/marine", self.marine_url), MARKER)
            .param("latitude", self.tide_region.latitude)
            .param("longitude", self.tide_region.longitude)
            .param("hourly", TIDE_HOURLY)
    }
}

#[async_trait]
impl Provider for OpenMeteo {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenMeteo
    }

    fn description(&self, capability: Capability) -> &'static str {
        match capability {
            Capability::Wave => WAVE_DESCRIPTION,
            Capability::Wind => WIND_DESCRIPTION,
            Capability::Tide => TIDE_DESCRIPTION,
        }
    }

    async fn wave_forecast(&self, at: Coordinates) -> Result<Value, ToolError> {
        execute(&self.client, self.wave_request(at)).await
    }

    async fn wind_forecast(&self, at: Coordinates) -> Result<Value, ToolError> {
        execute(&self.client, self.wind_request(at)).await
    }

    async fn tide_forecast(&self) -> Result<Value, ToolError> {
        execute(&self.client, self.tide_request()).await
    }
}
