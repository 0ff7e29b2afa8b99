// ─── Launch Orchestrator ───
// Starts the launch engine and drives one session from its event channel.
// Each session is owned by a single task; the slot guarantees there is at
// most one such task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::core::config::{CloseBehavior, LaunchConfiguration};
use crate::core::emit::{HostWindow, PanelEmitter, PanelUpdate, WindowSignal};
use crate::core::error::{PanelError, PanelResult};
use crate::core::mods::ModInventoryScanner;
use crate::core::paths::GamePaths;

use super::event::{EngineEvent, LaunchEngine, LaunchRequest};
use super::session::{LaunchSession, SessionHandle, SessionLease, SessionSlot};
use super::state::LaunchState;
use super::view::LaunchView;

/// Exit code reported when a session ends without the engine's `close`.
pub const ABANDONED_EXIT_CODE: i32 = -1;

pub struct LaunchOrchestrator {
    engine: Arc<dyn LaunchEngine>,
    emitter: Arc<dyn PanelEmitter>,
    window: Arc<dyn HostWindow>,
    scanner: ModInventoryScanner,
    slot: SessionSlot,
    error_grace: Option<Duration>,
}

impl LaunchOrchestrator {
    pub fn new(
        engine: Arc<dyn LaunchEngine>,
        emitter: Arc<dyn PanelEmitter>,
        window: Arc<dyn HostWindow>,
    ) -> Self {
        Self {
            engine,
            emitter,
            window,
            scanner: ModInventoryScanner,
            slot: SessionSlot::default(),
            error_grace: None,
        }
    }

    /// Close a session that stays `Errored` this long without hearing from the engine.
    /// Without it, an error that is never followed by `close` keeps the session open.
    pub fn with_error_grace(mut self, grace: Duration) -> Self {
        self.error_grace = Some(grace);
        self
    }

    pub fn active_session(&self) -> Option<Uuid> {
        self.slot.active()
    }

    /// Hands `config` to the engine and returns as soon as the engine accepted it.
    /// Everything after that arrives through the view emitter and window signals.
    pub async fn start_launch(&self, config: LaunchConfiguration) -> PanelResult<SessionHandle> {
        let session = LaunchSession::new();
        let lease = self.slot.acquire(session.id)?;
        info!(
            "Starting launch session {} for {} ({})",
            session.id, config.game_version, config.loader.loader_type
        );

        let mods_dir = GamePaths::from_install_root(&config.install_root).mods_dir();
        let inventory = self.scanner.scan(&mods_dir).await;
        self.emitter.emit(PanelUpdate::Mods(inventory));

        let view = LaunchView::launching();
        self.emitter.emit(PanelUpdate::Launch(view.clone()));

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let request = LaunchRequest::from(&config);
        if let Err(err) = self.engine.launch(request, events_tx).await {
            error!("Launch engine refused session {}: {}", session.id, err);
            self.emitter.emit(PanelUpdate::Launch(LaunchView::idle()));
            return Err(match err {
                PanelError::Engine(_) => err,
                other => PanelError::Engine(other.to_string()),
            });
        }

        let id = session.id;
        let (state_tx, state_rx) = watch::channel(session.state);
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let driver = SessionDriver {
            session,
            view,
            started: false,
            close_behavior: config.close_behavior,
            error_grace: self.error_grace,
            emitter: Arc::clone(&self.emitter),
            window: Arc::clone(&self.window),
            state_tx,
            lease,
        };
        let task = tokio::spawn(driver.run(events_rx, cancel_rx));

        Ok(SessionHandle::new(id, state_rx, cancel_tx, task))
    }
}

struct SessionDriver {
    session: LaunchSession,
    view: LaunchView,
    /// Whether the game already produced output.
    started: bool,
    close_behavior: CloseBehavior,
    error_grace: Option<Duration>,
    emitter: Arc<dyn PanelEmitter>,
    window: Arc<dyn HostWindow>,
    state_tx: watch::Sender<LaunchState>,
    lease: SessionLease,
}

impl SessionDriver {
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<EngineEvent>,
        mut cancel: oneshot::Receiver<()>,
    ) -> LaunchSession {
        let mut cancel_armed = true;

        while !self.session.state.is_terminal() {
            let state = self.session.state;
            let event = tokio::select! {
                requested = &mut cancel, if cancel_armed => {
                    cancel_armed = false;
                    if requested.is_err() {
                        // Handle dropped; the session keeps running.
                        continue;
                    }
                    info!("Launch session {} cancelled", self.session.id);
                    EngineEvent::Close(ABANDONED_EXIT_CODE)
                }
                next = next_event(state, self.error_grace, &mut events) => match next {
                    Some(event) => event,
                    None => {
                        warn!(
                            "Launch engine dropped session {} without closing it",
                            self.session.id
                        );
                        EngineEvent::Close(ABANDONED_EXIT_CODE)
                    }
                },
            };

            self.handle(event);
        }

        let SessionDriver { session, lease, .. } = self;
        debug!("Releasing launch session {}", lease.id());
        drop(lease);
        session
    }

    fn handle(&mut self, event: EngineEvent) {
        log_event(self.session.id, &event);

        let previous = self.session.apply(&event);
        if previous.is_terminal() {
            return;
        }
        if previous != self.session.state {
            debug!(
                "Session {}: {:?} -> {:?}",
                self.session.id, previous, self.session.state
            );
            self.state_tx.send_replace(self.session.state);
        }

        for signal in self.window_signals(&event) {
            self.window.signal(signal);
        }

        let before = self.view.clone();
        self.view.apply(&event);
        if self.view != before {
            self.emitter.emit(PanelUpdate::Launch(self.view.clone()));
        }
    }

    fn window_signals(&mut self, event: &EngineEvent) -> Vec<WindowSignal> {
        match event {
            EngineEvent::Check { current, total } | EngineEvent::Progress { current, total } => {
                vec![WindowSignal::Progress {
                    current: (*current).min(*total),
                    total: *total,
                }]
            }
            EngineEvent::Data(_) if !self.started => {
                self.started = true;
                let mut signals = vec![WindowSignal::ResetProgress];
                if self.close_behavior.hides_launcher() {
                    signals.push(WindowSignal::Hide);
                }
                signals
            }
            EngineEvent::Close(_) if self.close_behavior.hides_launcher() => {
                vec![WindowSignal::Show]
            }
            _ => Vec::new(),
        }
    }
}

async fn next_event(
    state: LaunchState,
    error_grace: Option<Duration>,
    events: &mut mpsc::UnboundedReceiver<EngineEvent>,
) -> Option<EngineEvent> {
    match (state, error_grace) {
        (LaunchState::Errored, Some(grace)) => {
            match tokio::time::timeout(grace, events.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    warn!(
                        "No close after engine error within {} ms, closing session",
                        grace.as_millis()
                    );
                    Some(EngineEvent::Close(ABANDONED_EXIT_CODE))
                }
            }
        }
        _ => events.recv().await,
    }
}

fn log_event(session: Uuid, event: &EngineEvent) {
    match event {
        EngineEvent::Extract(name) => debug!("[{}] extract {}", session, name),
        EngineEvent::Check { current, total } | EngineEvent::Progress { current, total } => {
            debug!("[{}] {} {}/{}", session, event.name(), current, total)
        }
        EngineEvent::Estimated(_) | EngineEvent::Speed(_) => {}
        EngineEvent::Patch(patch) => info!("[{}] patch {}", session, patch),
        EngineEvent::Data(line) => debug!("[{}][game] {}", session, line),
        EngineEvent::Close(code) => info!("[{}] game closed with code {}", session, code),
        EngineEvent::Error(message) => error!("[{}] launch engine error: {}", session, message),
    }
}
