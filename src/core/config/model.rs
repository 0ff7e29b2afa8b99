use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::{PanelError, PanelResult};
use crate::core::paths::LAUNCHER_CONFIG_DIR;

/// Mod loader the game profile asks the engine to install.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoaderType {
    #[serde(alias = "none")]
    Vanilla,
    Forge,
    Fabric,
    NeoForge,
    Quilt,
}

impl std::fmt::Display for LoaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderType::Vanilla => write!(f, "vanilla"),
            LoaderType::Forge => write!(f, "forge"),
            LoaderType::Fabric => write!(f, "fabric"),
            LoaderType::NeoForge => write!(f, "neoforge"),
            LoaderType::Quilt => write!(f, "quilt"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoaderDescriptor {
    #[serde(rename = "type")]
    pub loader_type: LoaderType,
    #[serde(default)]
    pub build: String,
    #[serde(rename = "enable", default)]
    pub enabled: bool,
}

/// Account record handed to the engine as its authenticator.
///
/// Only `uuid` and `name` are interpreted here; tokens and provider metadata
/// are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHandle {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JVM heap bounds in megabytes. Always `0 < min_mb <= max_mb`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryBounds {
    min_mb: u32,
    max_mb: u32,
}

impl MemoryBounds {
    pub fn new(min_mb: u32, max_mb: u32) -> PanelResult<Self> {
        if min_mb == 0 || max_mb == 0 {
            return Err(PanelError::configuration(
                "ram",
                "memory bounds must be greater than zero",
            ));
        }
        if min_mb > max_mb {
            return Err(PanelError::configuration(
                "ram",
                format!("minimum memory ({min_mb} MB) exceeds maximum ({max_mb} MB)"),
            ));
        }
        Ok(Self { min_mb, max_mb })
    }

    pub fn min_mb(&self) -> u32 {
        self.min_mb
    }

    pub fn max_mb(&self) -> u32 {
        self.max_mb
    }

    /// `-Xms` value, e.g. `"2048M"`.
    pub fn jvm_min(&self) -> String {
        format!("{}M", self.min_mb)
    }

    /// `-Xmx` value, e.g. `"4096M"`.
    pub fn jvm_max(&self) -> String {
        format!("{}M", self.max_mb)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JavaRuntime {
    pub path: Option<PathBuf>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

/// What happens to the launcher window while the game runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CloseBehavior {
    /// Hide the launcher when the game starts, show it again on exit.
    CloseLauncher,
    /// Quit everything together; the game is not detached.
    CloseAll,
    #[default]
    KeepOpen,
}

impl CloseBehavior {
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("close-launcher") => CloseBehavior::CloseLauncher,
            Some("close-all") => CloseBehavior::CloseAll,
            _ => CloseBehavior::KeepOpen,
        }
    }

    pub fn hides_launcher(&self) -> bool {
        matches!(self, CloseBehavior::CloseLauncher)
    }

    pub fn detaches_game(&self) -> bool {
        !matches!(self, CloseBehavior::CloseAll)
    }
}

/// Everything one launch attempt needs. Built fresh for every attempt.
#[derive(Debug, Clone)]
pub struct LaunchConfiguration {
    pub account: AccountHandle,
    pub install_root: PathBuf,
    pub source_url: String,
    pub game_version: String,
    pub loader: LoaderDescriptor,
    pub verify: bool,
    pub ignored: Vec<String>,
    pub memory: MemoryBounds,
    pub java: JavaRuntime,
    pub screen: Option<ScreenSize>,
    pub close_behavior: CloseBehavior,
    pub detached: bool,
    pub timeout: Duration,
    pub download_concurrency: usize,
}

/// Prepends the launcher's own config folder and drops duplicates of it.
pub fn ignored_with_sentinel(extra: &[String]) -> Vec<String> {
    let mut ignored = Vec::with_capacity(extra.len() + 1);
    ignored.push(LAUNCHER_CONFIG_DIR.to_string());
    ignored.extend(
        extra
            .iter()
            .filter(|path| path.as_str() != LAUNCHER_CONFIG_DIR)
            .cloned(),
    );
    ignored
}
