//! Error types
//!
//! `ToolError` is what a caller sees inside a tool result. `ConfigError`
//! means the deployment itself is broken and is fatal at startup.

use std::path::PathBuf;

/// Longest slice of an upstream error body embedded in a message
const MAX_BODY_EXCERPT: usize = 200;

/// Per-call failures, returned to the caller as `{"error": ...}`
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid args: {0}")]
    InvalidArgument(String),

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API request failed: timed out after {0}s")]
    Timeout(u64),

    #[error("API request failed: HTTP {status} from {url}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("Invalid JSON response from API.")]
    InvalidJson,

    #[error("Invalid API response format.")]
    InvalidFormat { marker: &'static str },
}

/// Coarse classification of a `ToolError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// Bad input, rejected before any network call
    Argument,
    /// Network failure, timeout or non-2xx status
    UpstreamTransport,
    /// 2xx response that is not JSON or lacks the marker field
    UpstreamFormat,
}

impl ToolError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ToolError::InvalidArgument(msg.into())
    }

    pub fn status(status: u16, url: impl Into<String>, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(MAX_BODY_EXCERPT) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        ToolError::Status { status, url: url.into(), body }
    }

    pub fn kind(&self) -> ToolErrorKind {
        match self {
            ToolError::InvalidArgument(_) => ToolErrorKind::Argument,
            ToolError::Transport(_) | ToolError::Timeout(_) | ToolError::Status { .. } => {
                ToolErrorKind::UpstreamTransport
            }
            ToolError::InvalidJson | ToolError::InvalidFormat { .. } => ToolErrorKind::UpstreamFormat,
        }
    }
}

/// Deployment faults: bad settings, missing env values, missing reference files
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment value: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Reference file {} is unreadable: {source}", .path.display())]
    ReferenceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reference file {} is malformed: {source}", .path.display())]
    ReferenceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::Invalid(msg.into())
    }
}
