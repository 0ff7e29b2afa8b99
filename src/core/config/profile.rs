use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{PanelError, PanelResult};

use super::model::LoaderDescriptor;

const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 30;
const DEFAULT_LAUNCH_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusEndpoint {
    pub address: String,
    pub port: u16,
}

/// Static description of the game this launcher serves, shipped with the launcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameProfile {
    pub base_url: String,
    #[serde(default)]
    pub user: Option<String>,
    /// Overrides the URL derived from `base_url` when non-empty.
    #[serde(default)]
    pub game_url: Option<String>,
    pub game_version: String,
    pub loader: LoaderDescriptor,
    #[serde(default)]
    pub verify: bool,
    #[serde(default)]
    pub ignored: Vec<String>,
    pub data_directory: String,
    pub status: StatusEndpoint,
    #[serde(default = "default_download_concurrency")]
    pub download_concurrency: usize,
    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,
}

fn default_download_concurrency() -> usize {
    DEFAULT_DOWNLOAD_CONCURRENCY
}

fn default_launch_timeout_ms() -> u64 {
    DEFAULT_LAUNCH_TIMEOUT_MS
}

impl GameProfile {
    pub async fn load(path: &Path) -> PanelResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PanelError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let profile: GameProfile = serde_json::from_str(&raw)?;
        info!(
            "Loaded game profile {} ({}) from {:?}",
            profile.game_version, profile.loader.loader_type, path
        );
        Ok(profile)
    }

    /// Where the engine fetches game files from.
    pub fn source_url(&self) -> String {
        if let Some(url) = self.game_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return url.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        match self.user.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(user) => format!("{}/{}/files", base, user),
            None => format!("{}/files", base),
        }
    }
}
