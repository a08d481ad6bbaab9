//! Tool registry

pub mod args;
pub mod forecast;
pub mod spots;

pub use forecast::{ForecastTool, TideForecastTool};
pub use spots::{PreferencesTool, SpotsTool};

use serde_json::Value;
use std::sync::Arc;

use crate::error::ToolError;
use crate::provider::Provider;
use crate::reference::ReferenceStore;
use crate::{Tool, ToolResult};

/// All available tools
pub fn all_tools(provider: Arc<dyn Provider>, store: ReferenceStore) -> Vec<Box<dyn Tool>> {
    vec![
        // Reference data
        Box::new(SpotsTool::new(store.clone())),
        Box::new(PreferencesTool::new(store)),
        // Forecasts
        Box::new(ForecastTool::wave(provider.clone())),
        Box::new(ForecastTool::wind(provider.clone())),
        Box::new(TideForecastTool::new(provider)),
    ]
}

/// Find tool by name
pub fn find_tool<'a>(tools: &'a [Box<dyn Tool>], name: &str) -> Option<&'a dyn Tool> {
    tools.iter().find(|t| t.name() == name).map(|t| &**t)
}

/// Convert a provider outcome into the caller-facing result, logging failures
pub(crate) fn finish(tool: &str, result: Result<Value, ToolError>) -> ToolResult {
    if let Err(e) = &result {
        tracing::warn!(tool, kind = ?e.kind(), "{e}");
    }
    result.into()
}
