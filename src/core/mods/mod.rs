use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

pub const MOD_EXTENSION: &str = ".jar";
pub const NO_MODS_PLACEHOLDER: &str = "No mods found";

/// Installed add-ons, in the order the directory listing returned them.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModInventory {
    /// The mods directory does not exist or could not be read.
    Missing,
    Listed { files: Vec<String> },
}

impl ModInventory {
    pub fn files(&self) -> &[String] {
        match self {
            ModInventory::Missing => &[],
            ModInventory::Listed { files } => files,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    /// Text the panel shows instead of a list, if any.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.is_empty().then_some(NO_MODS_PLACEHOLDER)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModInventoryScanner;

impl ModInventoryScanner {
    pub async fn scan(&self, directory: &Path) -> ModInventory {
        match tokio::fs::try_exists(directory).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("Mods directory {:?} does not exist", directory);
                return ModInventory::Missing;
            }
            Err(e) => {
                warn!("Cannot check mods directory {:?}: {}", directory, e);
                return ModInventory::Missing;
            }
        }

        let mut entries = match tokio::fs::read_dir(directory).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read mods directory {:?}: {}", directory, e);
                return ModInventory::Missing;
            }
        };

        let mut files = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let name = entry.file_name().to_string_lossy().to_string();
                    if name.ends_with(MOD_EXTENSION) {
                        files.push(name);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Stopped listing {:?} early: {}", directory, e);
                    break;
                }
            }
        }

        debug!("Found {} mods in {:?}", files.len(), directory);
        ModInventory::Listed { files }
    }
}
