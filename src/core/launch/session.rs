use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::core::error::{PanelError, PanelResult};
use crate::core::progress::{ProgressPhase, ProgressSample};

use super::event::EngineEvent;
use super::state::{transition, LaunchState};

/// One launch attempt, from request to the engine's `close`.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchSession {
    pub id: Uuid,
    pub state: LaunchState,
    pub last_sample: Option<ProgressSample>,
    pub last_error: Option<String>,
    pub exit_code: Option<i32>,
    pub started_at: DateTime<Utc>,
}

impl LaunchSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: LaunchState::Idle,
            last_sample: None,
            last_error: None,
            exit_code: None,
            started_at: Utc::now(),
        }
    }

    /// Records `event` and advances the state. Returns the state before the event.
    pub fn apply(&mut self, event: &EngineEvent) -> LaunchState {
        let previous = self.state;
        if previous.is_terminal() {
            return previous;
        }

        match event {
            EngineEvent::Check { current, total } => {
                self.last_sample = Some(ProgressSample::new(
                    ProgressPhase::Verifying,
                    *current,
                    *total,
                ));
            }
            EngineEvent::Progress { current, total } => {
                self.last_sample = Some(ProgressSample::new(
                    ProgressPhase::Downloading,
                    *current,
                    *total,
                ));
            }
            EngineEvent::Error(message) => self.last_error = Some(message.clone()),
            EngineEvent::Close(code) => self.exit_code = Some(*code),
            _ => {}
        }

        self.state = transition(previous, event);
        previous
    }
}

impl Default for LaunchSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the id of the one session allowed to run.
#[derive(Debug, Clone, Default)]
pub struct SessionSlot {
    active: Arc<Mutex<Option<Uuid>>>,
}

impl SessionSlot {
    pub fn acquire(&self, id: Uuid) -> PanelResult<SessionLease> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = *active {
            return Err(PanelError::LaunchRejected(current));
        }

        *active = Some(id);
        Ok(SessionLease {
            slot: self.clone(),
            id,
        })
    }

    pub fn active(&self) -> Option<Uuid> {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive right to run a session. Dropping it frees the slot.
#[derive(Debug)]
pub struct SessionLease {
    slot: SessionSlot,
    id: Uuid,
}

impl SessionLease {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        let mut active = self
            .slot
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *active == Some(self.id) {
            *active = None;
        }
    }
}

/// Caller's view of a running session.
///
/// Dropping the handle does not stop the session.
#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    state: watch::Receiver<LaunchState>,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<LaunchSession>,
}

impl SessionHandle {
    pub(crate) fn new(
        id: Uuid,
        state: watch::Receiver<LaunchState>,
        cancel: oneshot::Sender<()>,
        task: JoinHandle<LaunchSession>,
    ) -> Self {
        Self {
            id,
            state,
            cancel: Some(cancel),
            task,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> LaunchState {
        *self.state.borrow()
    }

    pub fn state_updates(&self) -> watch::Receiver<LaunchState> {
        self.state.clone()
    }

    /// Ends the session as if the engine had closed it. No-op after the first call.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Waits for the session to reach `Closed` and returns its final record.
    pub async fn join(self) -> PanelResult<LaunchSession> {
        let SessionHandle {
            task, cancel: _cancel, ..
        } = self;
        task.await
            .map_err(|e| PanelError::Other(format!("launch session task failed: {e}")))
    }
}
