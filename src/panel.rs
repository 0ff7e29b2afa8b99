use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::core::config::{ConfigurationResolver, GameProfile};
use crate::core::emit::{HostWindow, Notice, NoticeLevel, PanelEmitter, PanelUpdate};
use crate::core::error::{PanelError, PanelResult};
use crate::core::launch::{LaunchEngine, LaunchOrchestrator, LaunchView, SessionHandle};
use crate::core::mods::ModInventoryScanner;
use crate::core::paths::{default_app_data_root, GamePaths};
use crate::core::settings::JsonSettingsStore;
use crate::core::status::{ServerStatusMonitor, StatusChecker};

const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub status_timeout: Duration,
    /// See [`LaunchOrchestrator::with_error_grace`].
    pub error_grace: Option<Duration>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            error_grace: None,
        }
    }
}

/// Collaborators the host application provides.
pub struct PanelServices {
    pub engine: Arc<dyn LaunchEngine>,
    pub checker: Arc<dyn StatusChecker>,
    pub emitter: Arc<dyn PanelEmitter>,
    pub window: Arc<dyn HostWindow>,
}

pub struct LauncherPanel {
    resolver: ConfigurationResolver,
    orchestrator: LaunchOrchestrator,
    monitor: ServerStatusMonitor,
    scanner: ModInventoryScanner,
    emitter: Arc<dyn PanelEmitter>,
    options: PanelOptions,
}

impl LauncherPanel {
    pub fn new(resolver: ConfigurationResolver, services: PanelServices, options: PanelOptions) -> Self {
        let mut orchestrator = LaunchOrchestrator::new(
            services.engine,
            Arc::clone(&services.emitter),
            services.window,
        );
        if let Some(grace) = options.error_grace {
            orchestrator = orchestrator.with_error_grace(grace);
        }

        Self {
            resolver,
            orchestrator,
            monitor: ServerStatusMonitor::new(services.checker),
            scanner: ModInventoryScanner,
            emitter: services.emitter,
            options,
        }
    }

    /// Loads the game profile; settings are read from the platform data directory at launch time.
    pub async fn open(
        profile_path: &Path,
        services: PanelServices,
        options: PanelOptions,
    ) -> PanelResult<Self> {
        Self::open_at(&default_app_data_root(), profile_path, services, options).await
    }

    pub async fn open_at(
        app_data_root: &Path,
        profile_path: &Path,
        services: PanelServices,
        options: PanelOptions,
    ) -> PanelResult<Self> {
        let profile = GameProfile::load(profile_path).await?;
        let paths = GamePaths::new(app_data_root, &profile.data_directory);
        let store = JsonSettingsStore::new(paths.settings_file());
        info!(
            "Panel using install root {:?}, settings {:?}",
            paths.install_root(),
            store.path()
        );

        let resolver = ConfigurationResolver::new(Arc::new(store), profile, paths);
        Ok(Self::new(resolver, services, options))
    }

    pub fn orchestrator(&self) -> &LaunchOrchestrator {
        &self.orchestrator
    }

    /// Status poll and mod scan, run side by side. Never fails; both degrade to empty displays.
    pub async fn initialize(&self) {
        let endpoint = &self.resolver.profile().status;
        let mods_dir = self.resolver.paths().mods_dir();

        let (status, inventory) = tokio::join!(
            self.monitor
                .poll(&endpoint.address, endpoint.port, self.options.status_timeout),
            self.scanner.scan(&mods_dir),
        );
        info!(
            "Panel ready: server {} ({} players), {} mods",
            status.label(),
            status.player_count,
            inventory.files().len()
        );

        self.emitter.emit(PanelUpdate::ServerStatus(status));
        self.emitter.emit(PanelUpdate::Mods(inventory));
        if self.orchestrator.active_session().is_none() {
            self.emitter.emit(PanelUpdate::Launch(LaunchView::idle()));
        }
    }

    /// Resolves settings and starts a session.
    ///
    /// Configuration problems are shown as a blocking notice; the launch control stays enabled.
    pub async fn launch(&self) -> PanelResult<SessionHandle> {
        if let Some(active) = self.orchestrator.active_session() {
            debug!("Launch ignored, session {} still running", active);
            return Err(PanelError::LaunchRejected(active));
        }

        let config = match self.resolver.resolve().await {
            Ok(config) => config,
            Err(err) => {
                warn!("Cannot launch: {}", err);
                self.emitter.emit(PanelUpdate::Notice(Notice {
                    level: NoticeLevel::Blocking,
                    message: err.to_string(),
                }));
                return Err(err);
            }
        };

        match self.orchestrator.start_launch(config).await {
            Ok(handle) => Ok(handle),
            Err(err @ PanelError::LaunchRejected(_)) => {
                debug!("Launch ignored: {}", err);
                Err(err)
            }
            Err(err) => {
                error!("Launch failed to start: {}", err);
                Err(err)
            }
        }
    }
}
