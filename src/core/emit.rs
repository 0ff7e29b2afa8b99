// ─── Panel Emitters ───
// Outbound seams: computed values for the view, fire-and-forget signals for
// the host window. Neither side acknowledges anything.

use serde::Serialize;

use crate::core::launch::LaunchView;
use crate::core::mods::ModInventory;
use crate::core::status::ServerStatus;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Blocks the panel until dismissed.
    Blocking,
    Info,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum PanelUpdate {
    Launch(LaunchView),
    ServerStatus(ServerStatus),
    Mods(ModInventory),
    Notice(Notice),
}

pub trait PanelEmitter: Send + Sync {
    fn emit(&self, update: PanelUpdate);
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum WindowSignal {
    Hide,
    Show,
    /// Taskbar/dock progress.
    Progress { current: u64, total: u64 },
    ResetProgress,
}

pub trait HostWindow: Send + Sync {
    fn signal(&self, signal: WindowSignal);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_serialize_with_kind_tag() {
        let update = PanelUpdate::Notice(Notice {
            level: NoticeLevel::Blocking,
            message: "no account".into(),
        });
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["kind"], "notice");
        assert_eq!(json["payload"]["level"], "blocking");
    }

    #[test]
    fn window_signals_serialize_flat() {
        let json = serde_json::to_value(WindowSignal::Progress {
            current: 5,
            total: 10,
        })
        .unwrap();
        assert_eq!(json["signal"], "progress");
        assert_eq!(json["total"], 10);
    }
}
