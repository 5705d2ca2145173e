// Settings persistence: engine defaults stored in the platform config dir,
// e.g. ~/.config/dockyard/settings.json on Linux or
// ~/Library/Application Support/dockyard/settings.json on macOS.

use std::path::{Path, PathBuf};

use dockyard_core::LayoutSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DockyardSettings {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

/// How the final tree is printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Print each container's `fr` template.
    #[serde(default = "default_true")]
    pub templates: bool,
    /// Print the tab strip of every group.
    #[serde(default = "default_true")]
    pub tabs: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            templates: true,
            tabs: true,
        }
    }
}

pub fn settings_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("dockyard").join("settings.json"))
}

pub fn load_settings() -> DockyardSettings {
    match settings_path() {
        Some(path) => load_settings_from(&path),
        None => DockyardSettings::default(),
    }
}

/// Missing files give defaults silently; unreadable JSON is logged.
pub fn load_settings_from(path: &Path) -> DockyardSettings {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse {}: {}", path.display(), e);
                DockyardSettings::default()
            }
        },
        Err(_) => DockyardSettings::default(),
    }
}

pub fn save_settings_to(path: &Path, settings: &DockyardSettings) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("Failed to create config dir {}: {}", parent.display(), e);
            return;
        }
    }

    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                log::error!("Failed to write {}: {}", path.display(), e);
            }
        }
        Err(e) => {
            log::error!("Failed to serialize settings: {}", e);
        }
    }
}
