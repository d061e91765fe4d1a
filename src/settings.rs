//! Game settings and preferences
//!
//! Stored as JSON next to the binary. Missing or broken files fall back to
//! defaults so a bad settings file never blocks startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::sim::Rules;

/// Debug switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cheats {
    /// Hazards do no damage
    pub invulnerable: bool,
    /// Hold jump to fly upwards
    pub flight: bool,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Toggles (settings and pause menus) ===
    pub sound_fx: bool,
    pub music: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Gameplay ===
    /// Glide while jump is held
    pub wings: bool,
    pub cheats: Cheats,
    /// Draw hitboxes and tile grid
    pub debug_overlay: bool,

    // === Files ===
    /// Directory holding fileList.txt, levels/ and the media files
    pub asset_root: PathBuf,
    /// Seed for background track selection
    pub music_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_fx: true,
            music: true,
            show_fps: true,

            wings: true,
            cheats: Cheats::default(),
            debug_overlay: false,

            asset_root: PathBuf::from("platformer_assets"),
            music_seed: 0,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "tilehop_settings.json";

    /// Gameplay switches handed to the simulation
    pub fn rules(&self) -> Rules {
        Rules {
            wings: self.wings,
            flight: self.cheats.flight,
            invulnerable: self.cheats.invulnerable,
        }
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
