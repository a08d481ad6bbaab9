//! Forecast tools - wave and wind for a spot, tide for the home region

use serde_json::{json, Value};
use std::sync::Arc;

use super::args::parse_coordinates;
use super::finish;
use crate::error::ConfigError;
use crate::provider::{Capability, Provider};
use crate::{BoxFuture, Tool, ToolResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpotForecast {
    Wave,
    Wind,
}

impl SpotForecast {
    fn capability(self) -> Capability {
        match self {
            SpotForecast::Wave => Capability::Wave,
            SpotForecast::Wind => Capability::Wind,
        }
    }
}

/// Week-ahead forecast for caller-supplied coordinates
pub struct ForecastTool {
    name: &'static str,
    kind: SpotForecast,
    provider: Arc<dyn Provider>,
}

impl ForecastTool {
    pub fn wave(provider: Arc<dyn Provider>) -> Self {
        Self { name: "get_wave_forecast_week", kind: SpotForecast::Wave, provider }
    }

    pub fn wind(provider: Arc<dyn Provider>) -> Self {
        Self { name: "get_wind_forecast_week", kind: SpotForecast::Wind, provider }
    }
}

impl Tool for ForecastTool {
    fn name(&self) -> &'static str { self.name }

    fn description(&self) -> &'static str {
        self.provider.description(self.kind.capability())
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "lat": {"type": ["string", "number"], "description": "Latitude (e.g., \"38.6756\")"},
                "lng": {"type": ["string", "number"], "description": "Longitude (e.g., \"-9.3378\")"}
            },
            "required": ["lat", "lng"]
        })
    }

    fn execute(&self, args: Value) -> BoxFuture<'_, Result<ToolResult, ConfigError>> {
        Box::pin(async move {
            let at = match parse_coordinates(args) {
                Ok(at) => at,
                Err(e) => return Ok(finish(self.name(), Err(e))),
            };
            tracing::info!(
                tool = self.name(),
                lat = at.latitude,
                lng = at.longitude,
                "Fetching forecast"
            );

            let result = match self.kind {
                SpotForecast::Wave => self.provider.wave_forecast(at).await,
                SpotForecast::Wind => self.provider.wind_forecast(at).await,
            };
            Ok(finish(self.name(), result))
        })
    }
}

/// Tide for the configured region; takes no arguments
pub struct TideForecastTool {
    provider: Arc<dyn Provider>,
}

impl TideForecastTool {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

impl Tool for TideForecastTool {
    fn name(&self) -> &'static str { "get_daily_tide_forecast" }

    fn description(&self) -> &'static str {
        self.provider.description(Capability::Tide)
    }

    fn schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    fn execute(&self, _args: Value) -> BoxFuture<'_, Result<ToolResult, ConfigError>> {
        Box::pin(async move {
            tracing::info!(tool = self.name(), "Fetching tide forecast");
            Ok(finish(self.name(), self.provider.tide_forecast().await))
        })
    }
}
