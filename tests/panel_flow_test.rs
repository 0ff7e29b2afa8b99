use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use launch_panel::core::emit::{HostWindow, NoticeLevel, PanelEmitter, PanelUpdate, WindowSignal};
use launch_panel::core::launch::{EngineEvent, EngineEvents, LaunchEngine, LaunchRequest, LaunchState};
use launch_panel::core::mods::ModInventory;
use launch_panel::core::paths::GamePaths;
use launch_panel::core::status::{StatusChecker, StatusReply};
use launch_panel::{LauncherPanel, PanelError, PanelOptions, PanelResult, PanelServices};
use serde_json::json;

#[derive(Default)]
struct Recorder {
    updates: Mutex<Vec<PanelUpdate>>,
    signals: Mutex<Vec<WindowSignal>>,
}

impl PanelEmitter for Recorder {
    fn emit(&self, update: PanelUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

impl HostWindow for Recorder {
    fn signal(&self, signal: WindowSignal) {
        self.signals.lock().unwrap().push(signal);
    }
}

struct Engine {
    script: Vec<EngineEvent>,
    requests: Mutex<Vec<serde_json::Value>>,
    held: Mutex<Option<EngineEvents>>,
}

impl Engine {
    fn new(script: Vec<EngineEvent>) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
            held: Mutex::new(None),
        }
    }
}

#[async_trait]
impl LaunchEngine for Engine {
    async fn launch(&self, request: LaunchRequest, events: EngineEvents) -> PanelResult<()> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(&request).unwrap());
        for event in &self.script {
            events.send(event.clone()).unwrap();
        }
        // Keep the channel open so an unscripted close never happens.
        *self.held.lock().unwrap() = Some(events);
        Ok(())
    }
}

struct Checker(Option<u32>);

#[async_trait]
impl StatusChecker for Checker {
    async fn check_status(&self, _address: &str, _port: u16) -> PanelResult<StatusReply> {
        match self.0 {
            Some(players) => Ok(StatusReply {
                player_count: players,
                latency_ms: Some(20),
            }),
            None => Err(PanelError::Network("connection refused".into())),
        }
    }
}

fn write_profile(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("profile.json");
    std::fs::write(
        &path,
        json!({
            "base_url": "https://launcher.example.net",
            "user": "team",
            "game_version": "1.20.1",
            "loader": { "type": "fabric", "build": "0.15.7", "enable": true },
            "verify": true,
            "ignored": ["options.txt"],
            "data_directory": "selvania",
            "status": { "address": "play.example.net", "port": 25565 }
        })
        .to_string(),
    )
    .unwrap();
    path
}

fn write_settings(app_root: &Path, close: &str) {
    let settings = GamePaths::new(app_root, "selvania").settings_file();
    std::fs::create_dir_all(settings.parent().unwrap()).unwrap();
    std::fs::write(
        settings,
        json!({
            "1234": {
                "accounts-selected": { "selected": "acc-1" },
                "ram": { "ramMin": "1", "ramMax": "2" },
                "screen": { "screen": { "width": "<auto>", "height": "<auto>" } },
                "launcher": { "launcher": { "close": close } }
            },
            "acc-1": { "accounts": { "uuid": "0f1e2d3c", "name": "Alex" } }
        })
        .to_string(),
    )
    .unwrap();
}

async fn open_panel(
    app_root: &Path,
    engine: Arc<Engine>,
    players: Option<u32>,
    recorder: Arc<Recorder>,
) -> LauncherPanel {
    let profile = write_profile(app_root);
    let services = PanelServices {
        engine,
        checker: Arc::new(Checker(players)),
        emitter: recorder.clone(),
        window: recorder,
    };
    let options = PanelOptions {
        status_timeout: Duration::from_millis(200),
        error_grace: None,
    };
    LauncherPanel::open_at(app_root, &profile, services, options)
        .await
        .unwrap()
}

#[tokio::test]
async fn initialize_reports_offline_server_and_missing_mods() {
    let root = tempfile::tempdir().unwrap();
    let recorder = Arc::new(Recorder::default());
    let panel = open_panel(root.path(), Arc::new(Engine::new(vec![])), None, recorder.clone()).await;

    panel.initialize().await;

    let updates = recorder.updates.lock().unwrap().clone();
    assert!(matches!(
        &updates[0],
        PanelUpdate::ServerStatus(status) if !status.reachable && status.player_count == 0
    ));
    assert_eq!(updates[1], PanelUpdate::Mods(ModInventory::Missing));
    assert!(matches!(&updates[2], PanelUpdate::Launch(view) if view.launch_control_visible));
}

#[tokio::test]
async fn initialize_reports_player_count() {
    let root = tempfile::tempdir().unwrap();
    let recorder = Arc::new(Recorder::default());
    let panel = open_panel(root.path(), Arc::new(Engine::new(vec![])), Some(7), recorder.clone()).await;

    panel.initialize().await;

    let updates = recorder.updates.lock().unwrap().clone();
    match &updates[0] {
        PanelUpdate::ServerStatus(status) => {
            assert!(status.reachable);
            assert_eq!(status.player_count, 7);
        }
        other => panic!("unexpected first update {:?}", other),
    }
}

#[tokio::test]
async fn missing_settings_surface_a_blocking_notice() {
    let root = tempfile::tempdir().unwrap();
    let recorder = Arc::new(Recorder::default());
    let engine = Arc::new(Engine::new(vec![]));
    let panel = open_panel(root.path(), engine.clone(), None, recorder.clone()).await;

    let result = panel.launch().await;

    assert!(matches!(result, Err(PanelError::Configuration { .. })));
    assert!(engine.requests.lock().unwrap().is_empty());
    assert!(panel.orchestrator().active_session().is_none());
    let updates = recorder.updates.lock().unwrap().clone();
    assert!(matches!(
        updates.last(),
        Some(PanelUpdate::Notice(notice)) if notice.level == NoticeLevel::Blocking
    ));
}

#[tokio::test]
async fn full_launch_cycle_with_close_launcher() {
    let root = tempfile::tempdir().unwrap();
    write_settings(root.path(), "close-launcher");
    let recorder = Arc::new(Recorder::default());
    let engine = Arc::new(Engine::new(vec![
        EngineEvent::Check {
            current: 10,
            total: 100,
        },
        EngineEvent::Progress {
            current: 50,
            total: 200,
        },
        EngineEvent::Estimated(3661.0),
        EngineEvent::Speed(1_067_008.0),
        EngineEvent::Data("[main] Setting user: Alex".into()),
        EngineEvent::Close(0),
    ]));
    let panel = open_panel(root.path(), engine.clone(), Some(3), recorder.clone()).await;

    let handle = panel.launch().await.unwrap();
    let session = handle.join().await.unwrap();
    assert_eq!(session.state, LaunchState::Closed);

    let signals = recorder.signals.lock().unwrap().clone();
    assert_eq!(signals.iter().filter(|s| **s == WindowSignal::Show).count(), 1);
    assert_eq!(signals.iter().filter(|s| **s == WindowSignal::Hide).count(), 1);

    let request = engine.requests.lock().unwrap()[0].clone();
    assert_eq!(request["url"], "https://launcher.example.net/team/files");
    assert_eq!(request["memory"]["min"], "1024M");
    assert_eq!(request["memory"]["max"], "2048M");
    assert_eq!(request["downloadFileMultiple"], 30);
    assert_eq!(request["timeout"], 10000);
    assert_eq!(request["detached"], true);
    assert_eq!(request["screen"], serde_json::Value::Null);
    assert_eq!(request["ignored"], json!(["launcher_config", "options.txt"]));
    assert_eq!(request["loader"]["type"], "fabric");

    let updates = recorder.updates.lock().unwrap().clone();
    match updates.last() {
        Some(PanelUpdate::Launch(view)) => {
            assert!(view.launch_control_visible);
            assert!(!view.progress_visible);
            assert_eq!(view.info_text, "Verifying");
        }
        other => panic!("unexpected last update {:?}", other),
    }
    let saw_eta = updates.iter().any(|u| {
        matches!(u, PanelUpdate::Launch(v) if v.estimated.as_deref() == Some("1h 1m 1s"))
    });
    assert!(saw_eta);
}

#[tokio::test]
async fn launch_while_running_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    write_settings(root.path(), "close-all");
    let recorder = Arc::new(Recorder::default());
    let engine = Arc::new(Engine::new(vec![EngineEvent::Check {
        current: 1,
        total: 10,
    }]));
    let panel = open_panel(root.path(), engine.clone(), None, recorder).await;

    let mut first = panel.launch().await.unwrap();
    let second = panel.launch().await;
    assert!(matches!(second, Err(PanelError::LaunchRejected(id)) if id == first.id()));
    assert_eq!(engine.requests.lock().unwrap().len(), 1);
    assert_eq!(engine.requests.lock().unwrap()[0]["detached"], false);

    first.cancel();
    first.join().await.unwrap();
    assert!(panel.orchestrator().active_session().is_none());
}

#[tokio::test]
async fn settings_saved_after_open_are_used_on_retry() {
    let root = tempfile::tempdir().unwrap();
    let recorder = Arc::new(Recorder::default());
    let engine = Arc::new(Engine::new(vec![]));
    let panel = open_panel(root.path(), engine.clone(), None, recorder).await;

    let first = panel.launch().await;
    assert!(matches!(first, Err(PanelError::Configuration { .. })));

    write_settings(root.path(), "close-all");
    let mut handle = panel.launch().await.unwrap();
    assert_eq!(engine.requests.lock().unwrap().len(), 1);
    assert_eq!(engine.requests.lock().unwrap()[0]["authenticator"]["name"], "Alex");

    handle.cancel();
    handle.join().await.unwrap();
}

#[tokio::test]
async fn corrupt_settings_only_block_the_launch() {
    let root = tempfile::tempdir().unwrap();
    let settings = GamePaths::new(root.path(), "selvania").settings_file();
    std::fs::create_dir_all(settings.parent().unwrap()).unwrap();
    std::fs::write(&settings, "{ not json").unwrap();

    let recorder = Arc::new(Recorder::default());
    let engine = Arc::new(Engine::new(vec![]));
    let panel = open_panel(root.path(), engine.clone(), Some(2), recorder.clone()).await;

    panel.initialize().await;
    {
        let updates = recorder.updates.lock().unwrap();
        assert!(matches!(&updates[0], PanelUpdate::ServerStatus(status) if status.reachable));
        assert!(matches!(&updates[1], PanelUpdate::Mods(_)));
        assert!(matches!(&updates[2], PanelUpdate::Launch(_)));
    }

    let result = panel.launch().await;
    assert!(matches!(result, Err(PanelError::Configuration { .. })));
    assert!(engine.requests.lock().unwrap().is_empty());
    let updates = recorder.updates.lock().unwrap().clone();
    assert!(matches!(
        updates.last(),
        Some(PanelUpdate::Notice(notice)) if notice.level == NoticeLevel::Blocking
    ));
}
