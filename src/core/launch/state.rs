use serde::Serialize;

use super::event::EngineEvent;

/// Lifecycle of one launch session.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LaunchState {
    Idle,
    Verifying,
    Downloading,
    Extracting,
    Patching,
    Starting,
    Running,
    /// The engine reported an error. Only `close` leaves this state.
    Errored,
    Closed,
}

impl LaunchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LaunchState::Closed)
    }
}

/// Next lifecycle state after `event`. Telemetry-only events keep the state.
pub fn transition(state: LaunchState, event: &EngineEvent) -> LaunchState {
    use LaunchState::*;

    match (state, event) {
        (Closed, _) => Closed,
        (_, EngineEvent::Close(_)) => Closed,
        (_, EngineEvent::Error(_)) => Errored,
        (Errored, _) => Errored,
        (_, EngineEvent::Check { .. }) => Verifying,
        (_, EngineEvent::Progress { .. }) => Downloading,
        (_, EngineEvent::Extract(_)) => Extracting,
        (_, EngineEvent::Patch(_)) => Patching,
        (Starting | Running, EngineEvent::Data(_)) => Running,
        (_, EngineEvent::Data(_)) => Starting,
        (current, EngineEvent::Estimated(_) | EngineEvent::Speed(_)) => current,
    }
}
