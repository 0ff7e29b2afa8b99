// ─── Configuration Resolver ───
// Assembles a `LaunchConfiguration` from persisted settings plus the static
// game profile. Reads happen in a fixed order and the first failure wins.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::core::error::{PanelError, PanelResult};
use crate::core::paths::GamePaths;
use crate::core::settings::{category, SettingsStore, DEFAULT_SCOPE};

use super::model::{
    ignored_with_sentinel, AccountHandle, CloseBehavior, JavaRuntime, LaunchConfiguration,
    MemoryBounds, ScreenSize,
};
use super::profile::GameProfile;

/// Stored width meaning "let the game pick its own window size".
pub const AUTO_SCREEN: &str = "<auto>";

pub struct ConfigurationResolver {
    store: Arc<dyn SettingsStore>,
    profile: GameProfile,
    paths: GamePaths,
}

impl ConfigurationResolver {
    pub fn new(store: Arc<dyn SettingsStore>, profile: GameProfile, paths: GamePaths) -> Self {
        Self {
            store,
            profile,
            paths,
        }
    }

    pub fn profile(&self) -> &GameProfile {
        &self.profile
    }

    pub fn paths(&self) -> &GamePaths {
        &self.paths
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self) -> PanelResult<LaunchConfiguration> {
        let account_id = self.selected_account_id().await?;
        let account = self.account(&account_id).await?;
        let memory = self.memory_bounds().await?;
        let java = JavaRuntime {
            path: self.java_path().await?,
            args: self.java_args().await?,
        };
        let screen = self.screen_size().await?;
        let close_behavior = self.close_behavior().await?;

        info!(
            "Resolved launch configuration for {} (memory {}-{} MB, close={:?})",
            account.name,
            memory.min_mb(),
            memory.max_mb(),
            close_behavior
        );

        Ok(LaunchConfiguration {
            account,
            install_root: self.paths.install_root().to_path_buf(),
            source_url: self.profile.source_url(),
            game_version: self.profile.game_version.clone(),
            loader: self.profile.loader.clone(),
            verify: self.profile.verify,
            ignored: ignored_with_sentinel(&self.profile.ignored),
            memory,
            java,
            screen,
            close_behavior,
            detached: close_behavior.detaches_game(),
            timeout: Duration::from_millis(self.profile.launch_timeout_ms),
            download_concurrency: self.profile.download_concurrency.max(1),
        })
    }

    async fn fetch(&self, scope: &str, key: &str) -> PanelResult<Option<Value>> {
        self.store
            .get(scope, key)
            .await
            .map_err(|err| PanelError::configuration(key, err.to_string()))
    }

    async fn require(&self, scope: &str, key: &str) -> PanelResult<Value> {
        self.fetch(scope, key)
            .await?
            .ok_or_else(|| PanelError::configuration(key, "setting is missing"))
    }

    async fn selected_account_id(&self) -> PanelResult<String> {
        let record = self
            .require(DEFAULT_SCOPE, category::SELECTED_ACCOUNT)
            .await?;
        record
            .get("selected")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                PanelError::configuration(category::SELECTED_ACCOUNT, "no account is selected")
            })
    }

    async fn account(&self, account_id: &str) -> PanelResult<AccountHandle> {
        let record = self.require(account_id, category::ACCOUNTS).await?;
        let account: AccountHandle = serde_json::from_value(record).map_err(|err| {
            PanelError::configuration(category::ACCOUNTS, format!("malformed account: {err}"))
        })?;

        if account.uuid.trim().is_empty() || account.name.trim().is_empty() {
            return Err(PanelError::configuration(
                category::ACCOUNTS,
                format!("account '{account_id}' has no uuid or name"),
            ));
        }
        Ok(account)
    }

    async fn memory_bounds(&self) -> PanelResult<MemoryBounds> {
        let record = self.require(DEFAULT_SCOPE, category::RAM).await?;
        let min_mb = gigabytes_to_mb(&record, "ramMin")?;
        let max_mb = gigabytes_to_mb(&record, "ramMax")?;
        MemoryBounds::new(min_mb, max_mb)
    }

    async fn java_path(&self) -> PanelResult<Option<PathBuf>> {
        let Some(record) = self.fetch(DEFAULT_SCOPE, category::JAVA_PATH).await? else {
            return Ok(None);
        };

        match record.get("path") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(path)) if path.trim().is_empty() => Ok(None),
            Some(Value::String(path)) => Ok(Some(PathBuf::from(path))),
            Some(other) => Err(PanelError::configuration(
                category::JAVA_PATH,
                format!("expected a path string, got {other}"),
            )),
        }
    }

    async fn java_args(&self) -> PanelResult<Vec<String>> {
        let Some(record) = self.fetch(DEFAULT_SCOPE, category::JAVA_ARGS).await? else {
            return Ok(Vec::new());
        };

        match record.get("args") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        PanelError::configuration(
                            category::JAVA_ARGS,
                            format!("expected string arguments, got {item}"),
                        )
                    })
                })
                .filter(|arg| arg.as_ref().map_or(true, |a| !a.trim().is_empty()))
                .collect(),
            Some(other) => Err(PanelError::configuration(
                category::JAVA_ARGS,
                format!("expected an argument list, got {other}"),
            )),
        }
    }

    async fn screen_size(&self) -> PanelResult<Option<ScreenSize>> {
        let Some(record) = self.fetch(DEFAULT_SCOPE, category::SCREEN).await? else {
            return Ok(None);
        };
        let Some(screen) = record.get("screen") else {
            return Ok(None);
        };

        if screen.get("width").and_then(Value::as_str) == Some(AUTO_SCREEN) {
            debug!("Screen size set to {}, letting the game decide", AUTO_SCREEN);
            return Ok(None);
        }

        let width = positive_dimension(screen, "width")?;
        let height = positive_dimension(screen, "height")?;
        Ok(Some(ScreenSize { width, height }))
    }

    async fn close_behavior(&self) -> PanelResult<CloseBehavior> {
        let record = self.fetch(DEFAULT_SCOPE, category::LAUNCHER).await?;
        let close = record
            .as_ref()
            .and_then(|r| r.get("launcher"))
            .and_then(|launcher| launcher.get("close"))
            .and_then(Value::as_str);
        Ok(CloseBehavior::from_setting(close))
    }
}

/// Accepts numbers and numeric strings, the way the settings UI stores sliders.
fn numeric_field(record: &Value, field: &str) -> Option<f64> {
    match record.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn gigabytes_to_mb(record: &Value, field: &str) -> PanelResult<u32> {
    let gigabytes = numeric_field(record, field)
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| {
            PanelError::configuration(
                category::RAM,
                format!("{field} must be a positive number of gigabytes"),
            )
        })?;

    let megabytes = (gigabytes * 1024.0).round();
    if megabytes > u32::MAX as f64 {
        return Err(PanelError::configuration(
            category::RAM,
            format!("{field} is out of range"),
        ));
    }
    Ok(megabytes as u32)
}

fn positive_dimension(screen: &Value, field: &str) -> PanelResult<u32> {
    numeric_field(screen, field)
        .filter(|v| v.fract() == 0.0 && *v >= 1.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
        .ok_or_else(|| {
            PanelError::configuration(
                category::SCREEN,
                format!("{field} must be a positive integer or {AUTO_SCREEN}"),
            )
        })
}
