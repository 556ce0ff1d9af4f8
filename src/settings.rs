//! Player settings and preferences
//!
//! Persisted in LocalStorage, separate from the scorecard.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// Player settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty used when the page URL doesn't pick one
    pub difficulty: Difficulty,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            show_fps: false,
            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// Difficulty for this session: an explicit request wins over the saved one
    pub fn resolve_difficulty(&self, requested: Option<&str>) -> Difficulty {
        match requested {
            Some(name) => Difficulty::from_option(Some(name)),
            None => self.difficulty,
        }
    }

    /// Volume actually sent to the speakers
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Make `difficulty` the saved default. Returns true if it changed.
    pub fn remember_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty == difficulty {
            return false;
        }
        self.difficulty = difficulty;
        true
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn toggle_fps(&mut self) {
        self.show_fps = !self.show_fps;
    }

    /// Nudge the master volume, staying in 0..=1. Unmutes.
    pub fn adjust_volume(&mut self, delta: f32) {
        self.master_volume = (self.master_volume + delta).clamp(0.0, 1.0);
        self.muted = false;
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mini_golf_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_difficulty_wins() {
        let settings = Settings {
            difficulty: Difficulty::Hard,
            ..Default::default()
        };
        assert_eq!(settings.resolve_difficulty(None), Difficulty::Hard);
        assert_eq!(settings.resolve_difficulty(Some("medium")), Difficulty::Medium);
        assert_eq!(settings.resolve_difficulty(Some("???")), Difficulty::Easy);
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"difficulty":"Medium"}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert!(!settings.muted);
        assert!((settings.master_volume - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_remember_difficulty_reports_change() {
        let mut settings = Settings::default();
        assert!(!settings.remember_difficulty(Difficulty::Easy));
        assert!(settings.remember_difficulty(Difficulty::Hard));
        assert_eq!(settings.difficulty, Difficulty::Hard);
        // Saved value now wins when the URL doesn't ask
        assert_eq!(settings.resolve_difficulty(None), Difficulty::Hard);
    }

    #[test]
    fn test_volume_and_mute_controls() {
        let mut settings = Settings::default();
        settings.toggle_mute();
        assert_eq!(settings.effective_volume(), 0.0);

        settings.adjust_volume(0.5);
        assert!(!settings.muted);
        assert_eq!(settings.effective_volume(), 1.0);

        settings.adjust_volume(-2.0);
        assert_eq!(settings.master_volume, 0.0);
    }

    #[test]
    fn test_toggle_fps_round_trips_through_json() {
        let mut settings = Settings::default();
        settings.toggle_fps();
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert!(loaded.show_fps);
    }
}
