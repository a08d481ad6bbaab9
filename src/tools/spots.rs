//! Reference data tools - spot coordinates and surf preferences

use serde_json::{json, Value};

use crate::error::ConfigError;
use crate::reference::ReferenceStore;
use crate::{BoxFuture, Tool, ToolResult};

fn no_args() -> Value {
    json!({"type": "object", "properties": {}})
}

pub struct SpotsTool {
    store: ReferenceStore,
}

impl SpotsTool {
    pub fn new(store: ReferenceStore) -> Self {
        Self { store }
    }
}

impl Tool for SpotsTool {
    fn name(&self) -> &'static str { "get_surf_spots_coordinates" }

    fn description(&self) -> &'static str {
        "Get Lisbon surf spots with coordinates.

Returns: JSON with spot names as keys, each containing 'lat' and 'long'.
Example: {\"Carcavelos\": {\"lat\": 38.6756, \"long\": -9.3378}}"
    }

    fn schema(&self) -> Value { no_args() }

    fn execute(&self, _args: Value) -> BoxFuture<'_, Result<ToolResult, ConfigError>> {
        Box::pin(async move {
            let spots = self.store.read_spots().await?;
            tracing::info!(tool = self.name(), "Surf spots loaded");
            Ok(ToolResult::ok(spots))
        })
    }
}

pub struct PreferencesTool {
    store: ReferenceStore,
}

impl PreferencesTool {
    pub fn new(store: ReferenceStore) -> Self {
        Self { store }
    }
}

impl Tool for PreferencesTool {
    fn name(&self) -> &'static str { "get_surf_preferences" }

    fn description(&self) -> &'static str {
        "Get user's surf preferences.

Returns: JSON with waveHeight (min/max/preferred), preferredBeaches (weekday/weekend),
sessionTimes (weekday/weekend), and skillLevel."
    }

    fn schema(&self) -> Value { no_args() }

    fn execute(&self, _args: Value) -> BoxFuture<'_, Result<ToolResult, ConfigError>> {
        Box::pin(async move {
            let preferences = self.store.read_preferences().await?;
            tracing::info!(tool = self.name(), "Surf preferences loaded");
            Ok(ToolResult::ok(preferences))
        })
    }
}
