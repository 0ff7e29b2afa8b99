// ─── Server Status ───
// One-shot reachability probe for the game server shown on the panel.
// Failures never leave this module: the panel just shows "offline".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::error::{PanelError, PanelResult};

/// What the status-check collaborator reports for a reachable server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub player_count: u32,
    pub latency_ms: Option<u64>,
}

#[async_trait]
pub trait StatusChecker: Send + Sync {
    async fn check_status(&self, address: &str, port: u16) -> PanelResult<StatusReply>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServerStatus {
    pub reachable: bool,
    pub player_count: u32,
    pub latency_ms: Option<u64>,
    pub last_checked_at: DateTime<Utc>,
}

impl ServerStatus {
    pub fn offline() -> Self {
        Self {
            reachable: false,
            player_count: 0,
            latency_ms: None,
            last_checked_at: Utc::now(),
        }
    }

    pub fn label(&self) -> String {
        match (self.reachable, self.latency_ms) {
            (true, Some(ms)) => format!("Online - {}ms", ms),
            (true, None) => "Online".to_string(),
            (false, _) => "Offline".to_string(),
        }
    }
}

pub struct ServerStatusMonitor {
    checker: Arc<dyn StatusChecker>,
}

impl ServerStatusMonitor {
    pub fn new(checker: Arc<dyn StatusChecker>) -> Self {
        Self { checker }
    }

    pub async fn poll(&self, address: &str, port: u16, timeout: Duration) -> ServerStatus {
        let outcome = tokio::time::timeout(timeout, self.checker.check_status(address, port))
            .await
            .unwrap_or_else(|_| {
                Err(PanelError::Network(format!(
                    "no answer within {} ms",
                    timeout.as_millis()
                )))
            });

        match outcome {
            Ok(reply) => {
                debug!(
                    "Server {}:{} online with {} players",
                    address, port, reply.player_count
                );
                ServerStatus {
                    reachable: true,
                    player_count: reply.player_count,
                    latency_ms: reply.latency_ms,
                    last_checked_at: Utc::now(),
                }
            }
            Err(err) => {
                warn!("Server {}:{} treated as offline: {}", address, port, err);
                ServerStatus::offline()
            }
        }
    }
}
