//! Stormglass point API
//!
//! Every request is scoped to next week's window and authenticated with the
//! account key in the `Authorization` header.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use super::window::{next_week_window, WindowSpec};
use super::{execute, Capability, Coordinates, Provider};
use crate::config::{ProviderKind, ServerConfig};
use crate::error::ToolError;
use crate::upstream::{UpstreamClient, UpstreamRequest};

/// Monday 06:00 through Sunday 21:00, local time
pub const WEATHER_WINDOW: WindowSpec = WindowSpec { start_hour: 6, span_days: 6, end_hour: 21 };
/// Monday 00:00 through the following Monday 00:00, local time
pub const TIDE_WINDOW: WindowSpec = WindowSpec { start_hour: 0, span_days: 7, end_hour: 0 };

const WAVE_PARAMS: &str = "waveHeight,waveDirection,wavePeriod,swellHeight,swellDirection,swellPeriod";
const WIND_PARAMS: &str = "windSpeed,windDirection,gust";
const SOURCE: &str = "sg";

const WEATHER_MARKER: &str = "hours";
const TIDE_MARKER: &str = "data";

const WAVE_DESCRIPTION: &str = "Get next week's hourly wave and swell forecast for a surf spot (Monday 06:00 to Sunday 21:00 local time).

Args:
    lat: Latitude (e.g., \"38.6756\")
    lng: Longitude (e.g., \"-9.3378\")

Returns: JSON with an 'hours' array, one entry per hour:
    - time: ISO8601 UTC timestamp
    - waveHeight / swellHeight: meters (m)
    - waveDirection / swellDirection: degrees (0°=N, direction waves come FROM)
    - wavePeriod / swellPeriod: seconds (higher=better quality, 12-20s ideal)
Each value is keyed by source, e.g. {\"sg\": 1.4}.";

const WIND_DESCRIPTION: &str = "Get next week's hourly wind forecast for a surf spot (Monday 06:00 to Sunday 21:00 local time).

Args:
    lat: Latitude (e.g., \"38.6756\")
    lng: Longitude (e.g., \"-9.3378\")

Returns: JSON with an 'hours' array, one entry per hour:
    - time: ISO8601 UTC timestamp
    - windSpeed: m/s at 10m (ideal <4, blown out >7)
    - windDirection: degrees (0°=N, wind FROM direction)
    - gust: m/s
Each value is keyed by source, e.g. {\"sg\": 3.2}.

For Lisbon (west-facing): Offshore winds 90°-180° (ideal), Onshore 225°-315° (avoid).";

const TIDE_DESCRIPTION: &str = "Get next week's high and low tides for Lisbon (Monday to Monday, local time).

Returns: JSON with a 'data' array of extremes:
    - time: ISO8601 UTC timestamp
    - height: meters relative to mean sea level
    - type: \"high\" or \"low\"
Low tide = powerful/close to shore. High tide = cleaner/further out.
Mid-incoming/outgoing often ideal.";

pub struct Stormglass {
    client: UpstreamClient,
    base_url: String,
    api_key: String,
    timezone: Tz,
    tide_region: Coordinates,
}

impl Stormglass {
    pub fn new(client: UpstreamClient, config: &ServerConfig, api_key: &str) -> Self {
        Self {
            client,
            base_url: config.stormglass_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timezone: config.timezone,
            tide_region: Coordinates::new(config.tide_latitude, config.tide_longitude),
        }
    }

    fn point_request(&self, path: &str, marker: &'static str, at: Coordinates) -> UpstreamRequest {
        UpstreamRequest::get(format!("{}{}", self.base_url, path), marker)
            .param("lat", at.latitude)
            .param("lng", at.longitude)
            .authorization(self.api_key.as_str())
    }

    fn weather_request(&self, params: &str, at: Coordinates, now: DateTime<Utc>) -> UpstreamRequest {
        let window = next_week_window(now, self.timezone, WEATHER_WINDOW);
        self.point_request("/weather/point", WEATHER_MARKER, at)
            .param("params", params)
            .param("source", SOURCE)
            .param("start", window.start)
            .param("end", window.end)
    }

    pub fn wave_request(&self, at: Coordinates, now: DateTime<Utc>) -> UpstreamRequest {
        self.weather_request(WAVE_PARAMS, at, now)
    }

    pub fn wind_request(&self, at: Coordinates, now: DateTime<Utc>) -> UpstreamRequest {
        self.weather_request(WIND_PARAMS, at, now)
    }

    pub fn tide_request(&self, now: DateTime<Utc>) -> UpstreamRequest {
        let window = next_week_window(now, self.timezone, TIDE_WINDOW);
        self.point_request("/tide/extremes/point", TIDE_MARKER, self.tide_region)
            .param("start", window.start)
            .param("end", window.end)
    }
}

#[async_trait]
impl Provider for Stormglass {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Stormglass
    }

    fn description(&self, capability: Capability) -> &'static str {
        match capability {
            Capability::Wave => WAVE_DESCRIPTION,
            Capability::Wind => WIND_DESCRIPTION,
            Capability::Tide => TIDE_DESCRIPTION,
        }
    }

    async fn wave_forecast(&self, at: Coordinates) -> Result<Value, ToolError> {
        execute(&self.client, self.wave_request(at, Utc::now())).await
    }

    async fn wind_forecast(&self, at: Coordinates) -> Result<Value, ToolError> {
        execute(&self.client, self.wind_request(at, Utc::now())).await
    }

    async fn tide_forecast(&self) -> Result<Value, ToolError> {
        execute(&self.client, self.tide_request(Utc::now())).await
    }
}
