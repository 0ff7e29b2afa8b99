// ─── Settings Store ───
// Key-addressed access to small persisted records. The launcher database
// itself lives elsewhere; this module only defines how the panel reads it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::core::error::{PanelError, PanelResult};

/// Well-known scope under which the launcher keeps its global records.
pub const DEFAULT_SCOPE: &str = "1234";

pub mod category {
    pub const SELECTED_ACCOUNT: &str = "accounts-selected";
    pub const ACCOUNTS: &str = "accounts";
    pub const RAM: &str = "ram";
    pub const JAVA_PATH: &str = "java-path";
    pub const JAVA_ARGS: &str = "java-args";
    pub const SCREEN: &str = "screen";
    pub const LAUNCHER: &str = "launcher";
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the record stored under `(scope, category)`, if any.
    async fn get(&self, scope: &str, category: &str) -> PanelResult<Option<Value>>;
}

/// Settings kept in a JSON document shaped `{ "<scope>": { "<category>": value } }`.
///
/// The file is read on every lookup, so edits made by the settings screen are
/// visible to the next launch attempt. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> PanelResult<Option<Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Settings file {:?} not found", self.path);
                return Ok(None);
            }
            Err(source) => {
                return Err(PanelError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: Value = serde_json::from_str(&raw)?;
        if !document.is_object() {
            return Err(PanelError::Other(format!(
                "settings document {:?} must be a JSON object",
                self.path
            )));
        }
        Ok(Some(document))
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn get(&self, scope: &str, category: &str) -> PanelResult<Option<Value>> {
        let Some(document) = self.read_document().await? else {
            return Ok(None);
        };
        Ok(document
            .get(scope)
            .and_then(|categories| categories.get(category))
            .cloned())
    }
}
