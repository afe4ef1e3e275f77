//! Game settings and preferences
//!
//! Persisted as JSON next to the save data, separately from run records.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Audio ===
    /// Background music on/off
    pub music_on: bool,
    /// Sound effects on/off
    pub sfx_on: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === HUD ===
    /// Overlay markers where the player died on this floor
    pub show_death_points: bool,
    /// Show the timer/kill counters
    pub show_counters: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_on: true,
            sfx_on: true,
            music_volume: 0.1,
            sfx_volume: 0.2,
            show_death_points: false,
            show_counters: true,
        }
    }
}

impl Settings {
    /// Music volume the audio layer should apply (0 when toggled off)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_on { self.music_volume } else { 0.0 }
    }

    /// Effects volume the audio layer should apply (0 when toggled off)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sfx_on { self.sfx_volume } else { 0.0 }
    }

    /// Load settings from disk, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("corrupt settings file, using defaults: {e}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to disk (best effort)
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("failed to save settings: {e}");
                } else {
                    log::info!("settings saved");
                }
            }
            Err(e) => log::warn!("failed to serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.music_on);
        assert_eq!(s.music_volume, 0.1);
        assert_eq!(s.sfx_volume, 0.2);
    }

    #[test]
    fn test_toggles_zero_effective_volume() {
        let mut s = Settings::default();
        s.music_on = false;
        s.sfx_on = false;
        assert_eq!(s.effective_music_volume(), 0.0);
        assert_eq!(s.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = Settings::default();
        s.show_death_points = true;
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(back.show_death_points);
        assert_eq!(back.music_volume, s.music_volume);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let s = Settings::load(Path::new("/nonexistent/oubliette_settings.json"));
        assert!(s.music_on);
    }
}
