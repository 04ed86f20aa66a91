//! High score persistence
//!
//! Backends:
//! - `MemoryStore`: process lifetime only
//! - `JsonFileStore`: native, a small JSON record under the user config dir
//! - `LocalStorageStore`: web, a single LocalStorage key

use serde::{Deserialize, Serialize};

use crate::platform::{HighScoreStore, PlatformError};

/// On-disk shape of the persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// Keeps the best score in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: u64,
}

impl MemoryStore {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u64, PlatformError> {
        Ok(self.value)
    }

    fn save(&mut self, score: u64) -> Result<(), PlatformError> {
        self.value = score;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::HighScoreRecord;
    use crate::platform::{HighScoreStore, PlatformError};

    /// JSON file holding a `HighScoreRecord`
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `$GRAVITY_FLIP_SCORE_PATH`, else `$XDG_CONFIG_HOME/gravity-flip/highscore.json`,
        /// else `~/.config/gravity-flip/highscore.json`
        pub fn from_env() -> Self {
            if let Some(explicit) = std::env::var_os("GRAVITY_FLIP_SCORE_PATH") {
                return Self::new(explicit);
            }

            let mut path = std::env::var_os("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
                })
                .unwrap_or_else(|| PathBuf::from("."));
            path.push("gravity-flip");
            path.push("highscore.json");
            Self::new(path)
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl HighScoreStore for JsonFileStore {
        fn load(&mut self) -> Result<u64, PlatformError> {
            if !self.path.exists() {
                return Ok(0);
            }
            let bytes = fs::read(&self.path)?;
            let record: HighScoreRecord = serde_json::from_slice(&bytes)?;
            Ok(record.high_score)
        }

        fn save(&mut self, score: u64) -> Result<(), PlatformError> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let text = serde_json::to_string_pretty(&HighScoreRecord { high_score: score })?;
            fs::write(&self.path, text)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{LocalStorageStore, local_storage};

#[cfg(target_arch = "wasm32")]
mod web {
    use crate::platform::{HighScoreStore, PlatformError};

    /// The window's LocalStorage
    pub fn local_storage() -> Result<web_sys::Storage, PlatformError> {
        web_sys::window()
            .ok_or(PlatformError::Unavailable("window"))?
            .local_storage()
            .map_err(|e| PlatformError::Storage(format!("{:?}", e)))?
            .ok_or(PlatformError::Unavailable("LocalStorage"))
    }

    /// Best score as a plain integer string under one key
    #[derive(Debug, Clone)]
    pub struct LocalStorageStore {
        key: String,
    }

    impl LocalStorageStore {
        pub const DEFAULT_KEY: &'static str = "gravity_flip_high_score";

        pub fn new(key: impl Into<String>) -> Self {
            Self { key: key.into() }
        }
    }

    impl Default for LocalStorageStore {
        fn default() -> Self {
            Self::new(Self::DEFAULT_KEY)
        }
    }

    impl HighScoreStore for LocalStorageStore {
        fn load(&mut self) -> Result<u64, PlatformError> {
            let stored = local_storage()?
                .get_item(&self.key)
                .map_err(|e| PlatformError::Storage(format!("{:?}", e)))?;
            match stored {
                Some(text) => Ok(serde_json::from_str(&text)?),
                None => Ok(0),
            }
        }

        fn save(&mut self, score: u64) -> Result<(), PlatformError> {
            local_storage()?
                .set_item(&self.key, &score.to_string())
                .map_err(|e| PlatformError::Storage(format!("{:?}", e)))
        }
    }
}
