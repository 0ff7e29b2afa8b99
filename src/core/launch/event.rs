use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::core::config::{
    AccountHandle, JavaRuntime, LaunchConfiguration, LoaderDescriptor, ScreenSize,
};
use crate::core::error::PanelResult;

/// Everything the launch engine can report, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Extract(String),
    Progress { current: u64, total: u64 },
    Check { current: u64, total: u64 },
    /// Remaining seconds.
    Estimated(f64),
    /// Bytes per second.
    Speed(f64),
    Patch(String),
    /// A chunk of game output. The first one means the game process is up.
    Data(String),
    Close(i32),
    Error(String),
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::Extract(_) => "extract",
            EngineEvent::Progress { .. } => "progress",
            EngineEvent::Check { .. } => "check",
            EngineEvent::Estimated(_) => "estimated",
            EngineEvent::Speed(_) => "speed",
            EngineEvent::Patch(_) => "patch",
            EngineEvent::Data(_) => "data",
            EngineEvent::Close(_) => "close",
            EngineEvent::Error(_) => "error",
        }
    }
}

pub type EngineEvents = mpsc::UnboundedSender<EngineEvent>;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MemoryRequest {
    pub min: String,
    pub max: String,
}

/// Invocation payload for the launch engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub url: String,
    pub authenticator: AccountHandle,
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,
    pub path: PathBuf,
    pub version: String,
    pub detached: bool,
    #[serde(rename = "downloadFileMultiple")]
    pub download_concurrency: usize,
    pub loader: LoaderDescriptor,
    pub verify: bool,
    pub ignored: Vec<String>,
    pub java: JavaRuntime,
    pub memory: MemoryRequest,
    pub screen: Option<ScreenSize>,
}

impl From<&LaunchConfiguration> for LaunchRequest {
    fn from(config: &LaunchConfiguration) -> Self {
        Self {
            url: config.source_url.clone(),
            authenticator: config.account.clone(),
            timeout_ms: config.timeout.as_millis() as u64,
            path: config.install_root.clone(),
            version: config.game_version.clone(),
            detached: config.detached,
            download_concurrency: config.download_concurrency,
            loader: config.loader.clone(),
            verify: config.verify,
            ignored: config.ignored.clone(),
            java: config.java.clone(),
            memory: MemoryRequest {
                min: config.memory.jvm_min(),
                max: config.memory.jvm_max(),
            },
            screen: config.screen,
        }
    }
}

/// The external component that verifies, downloads, extracts and starts the game.
///
/// `launch` returns once the work is under way; progress arrives on `events`.
/// The engine must stop sending once the receiving side is gone.
#[async_trait]
pub trait LaunchEngine: Send + Sync {
    async fn launch(&self, request: LaunchRequest, events: EngineEvents) -> PanelResult<()>;
}
