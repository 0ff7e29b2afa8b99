use std::path::{Path, PathBuf};

/// Launcher-owned folder inside the install root. The engine must never touch it.
pub const LAUNCHER_CONFIG_DIR: &str = "launcher_config";

const SETTINGS_FILE: &str = "settings.json";
const MODS_DIR: &str = "mods";

/// Filesystem layout of one game installation.
#[derive(Debug, Clone)]
pub struct GamePaths {
    install_root: PathBuf,
}

impl GamePaths {
    /// `<app_data_root>/.<data_directory>`, or without the dot on macOS.
    pub fn new(app_data_root: &Path, data_directory: &str) -> Self {
        let folder = if cfg!(target_os = "macos") {
            data_directory.to_string()
        } else {
            format!(".{}", data_directory)
        };

        Self {
            install_root: app_data_root.join(folder),
        }
    }

    /// Layout rooted at the platform application-data directory.
    pub fn from_platform(data_directory: &str) -> Self {
        Self::new(&default_app_data_root(), data_directory)
    }

    pub fn from_install_root(install_root: &Path) -> Self {
        Self {
            install_root: install_root.to_path_buf(),
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.install_root.join(MODS_DIR)
    }

    pub fn launcher_config_dir(&self) -> PathBuf {
        self.install_root.join(LAUNCHER_CONFIG_DIR)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.launcher_config_dir().join(SETTINGS_FILE)
    }
}

pub fn default_app_data_root() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))
}
