pub mod core;
pub mod panel;

use tracing_subscriber::EnvFilter;

pub use crate::core::error::{PanelError, PanelResult};
pub use crate::panel::{LauncherPanel, PanelOptions, PanelServices};

/// Installs the structured logging subscriber. Safe to call more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,launch_panel=debug")),
        )
        .try_init();

    tracing::debug!("Launch panel logging initialized");
}
