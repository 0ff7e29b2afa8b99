use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Central error type for the panel backend.
/// Every module returns `Result<T, PanelError>`.
#[derive(Debug, Error)]
pub enum PanelError {
    // ── Configuration ───────────────────────────────────
    #[error("Configuration error for '{key}': {reason}")]
    Configuration { key: String, reason: String },

    // ── Launch ──────────────────────────────────────────
    #[error("A launch session is already active ({0})")]
    LaunchRejected(Uuid),

    #[error("Launch engine error: {0}")]
    Engine(String),

    // ── Telemetry ───────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ── Network ─────────────────────────────────────────
    #[error("Status check failed: {0}")]
    Network(String),

    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type PanelResult<T> = Result<T, PanelError>;

impl PanelError {
    pub fn configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        PanelError::Configuration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Errors the user can act on. Everything else degrades to a safe display state.
    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            PanelError::Configuration { .. } | PanelError::LaunchRejected(_)
        )
    }
}

impl From<std::io::Error> for PanelError {
    fn from(source: std::io::Error) -> Self {
        PanelError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
