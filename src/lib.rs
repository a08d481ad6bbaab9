//! Surf forecast tools - served to a planning agent over MCP
//!
//! Each tool wraps one upstream forecast endpoint or one reference file.
//! The agent does the reasoning; this crate only hands it validated data.

use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;

pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod normalize;
pub mod provider;
pub mod reference;
pub mod telemetry;
pub mod tools;
pub mod upstream;

pub use config::{ProviderKind, ServerConfig};
pub use error::{ConfigError, ToolError, ToolErrorKind};

/// Tool execution result: the upstream payload, or an `{"error": ...}` object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResult {
    Ok(Value),
    Err { error: String },
}

impl ToolResult {
    pub fn ok(payload: Value) -> Self {
        Self::Ok(payload)
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self::Err { error: error.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Err { .. })
    }

    /// The JSON value handed back to the caller
    pub fn into_value(self) -> Value {
        match self {
            Self::Ok(payload) => payload,
            Self::Err { error } => json!({ "error": error }),
        }
    }
}

impl From<Result<Value, ToolError>> for ToolResult {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(payload) => Self::ok(payload),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Boxed future for dyn compatibility
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for tools - dyn-compatible using BoxFuture
///
/// `Err` is reserved for broken deployments (missing reference data);
/// everything a caller can cause comes back as `ToolResult::Err`.
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> Value;
    fn execute(&self, args: Value) -> BoxFuture<'_, Result<ToolResult, ConfigError>>;
}
