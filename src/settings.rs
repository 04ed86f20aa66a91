//! Player preferences
//!
//! Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::PlatformError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Screen flash when a new phase starts
    pub phase_flash: bool,
    /// Outline collision boxes
    pub debug_hitboxes: bool,

    // === Accessibility ===
    /// Reduced motion (no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            phase_flash: true,
            debug_hitboxes: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective phase flash (respects reduced_motion)
    pub fn effective_phase_flash(&self) -> bool {
        self.phase_flash && !self.reduced_motion
    }

    /// Gain applied to sound effects
    pub fn effective_sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Toggle the setting bound to `key` (`h` hitboxes, `f` phase flash).
    /// Returns false for unbound keys.
    pub fn apply_hotkey(&mut self, key: &str) -> bool {
        match key {
            "h" | "H" => self.debug_hitboxes = !self.debug_hitboxes,
            "f" | "F" => self.phase_flash = !self.phase_flash,
            _ => return false,
        }
        true
    }

    /// Clamp volumes into range (hand-edited storage)
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gravity_flip_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self, PlatformError> {
        let stored = crate::persistence::local_storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|e| PlatformError::Storage(format!("{:?}", e)))?;
        match stored {
            Some(json) => {
                let settings: Settings = serde_json::from_str(&json)?;
                log::info!("Loaded settings from LocalStorage");
                Ok(settings.sanitized())
            }
            None => Ok(Self::default()),
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), PlatformError> {
        let json = serde_json::to_string(self)?;
        crate::persistence::local_storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| PlatformError::Storage(format!("{:?}", e)))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, PlatformError> {
        Ok(Self::default())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), PlatformError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_suppresses_flash() {
        let mut s = Settings::default();
        assert!(s.effective_phase_flash());
        s.reduced_motion = true;
        assert!(!s.effective_phase_flash());
    }

    #[test]
    fn test_sfx_gain_respects_mute() {
        let mut s = Settings::default();
        assert!((s.effective_sfx_gain() - 0.8).abs() < 1e-6);
        s.muted = true;
        assert_eq!(s.effective_sfx_gain(), 0.0);
    }

    #[test]
    fn test_hotkeys_toggle_and_save() {
        let mut s = Settings::default();
        assert!(s.apply_hotkey("h"));
        assert!(s.debug_hitboxes);
        assert!(s.apply_hotkey("F"));
        assert!(!s.effective_phase_flash());
        assert!(!s.apply_hotkey(" "));
        assert!(s.save().is_ok());

        assert!(s.apply_hotkey("H"));
        assert!(!s.debug_hitboxes);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "debug_hitboxes": true, "master_volume": 4.0 }"#)
            .unwrap();
        let s = s.sanitized();
        assert!(s.debug_hitboxes);
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.sfx_volume, 1.0);
    }
}
