//! Platform abstraction layer
//!
//! Collaborator seams the session talks to:
//! - Scoreboard sink (submit / fetch top scores)
//! - Persisted high score (key-value store)
//! - Audio sink
//! - Assets (sprite sizes and colours by name)
//! - Input edge latching
//!
//! Every fallible call returns `PlatformError`. Only the session controller
//! decides what to do with a failure.

pub mod assets;
pub mod input;
#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use assets::{AssetProvider, ProceduralAssets, SpriteInfo};
pub use input::InputLatch;

/// Collaborator failure
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("malformed stored data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0} is not available")]
    Unavailable(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of the scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
}

/// Where finished runs are reported
pub trait Scoreboard {
    fn submit(&mut self, score: u64) -> Result<(), PlatformError>;
    /// Best `n` scores, highest first
    fn fetch_top(&mut self, n: usize) -> Result<Vec<ScoreEntry>, PlatformError>;
}

/// Durable storage for the single best score
pub trait HighScoreStore {
    /// Stored best, 0 if nothing has been saved yet
    fn load(&mut self) -> Result<u64, PlatformError>;
    fn save(&mut self, score: u64) -> Result<(), PlatformError>;
}

/// Feedback sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Gravity flipped
    Flip,
    /// New phase reached
    PhaseUp,
    /// Run ended
    Hit,
}

/// Fire-and-forget sound playback
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Silent sink (native host, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Wall-clock time in milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock time in milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
