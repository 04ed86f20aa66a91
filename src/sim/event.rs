//! Events flowing through the per-tick queue
//!
//! Timers, physics contacts and input all become `GameEvent`s, dispatched in
//! the fixed tick order. Everything dispatched is also handed back to the host
//! so the presentation layer can react (sounds, flashes, HUD).

use serde::{Deserialize, Serialize};

use super::obstacles::Lane;
use super::player::Surface;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FatalCause {
    /// Player hitbox overlapped a spike
    Obstacle { id: u32 },
    /// Player left the visible vertical range
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Distance crossed a phase boundary
    PhaseAdvanced { from: u32, to: u32 },
    /// Player touched a platform
    SurfaceContacted { surface: Surface },
    /// Debounce expired with no platform overlap
    SurfaceLost,
    FatalCollision { cause: FatalCause },
    FlipRequested,
    /// A flip was accepted; player now targets `to`
    Flipped { to: Surface },
    ObstacleSpawned { id: u32, lane: Lane, x: f32 },
    ObstacleEvicted { id: u32 },
    /// Run ended with this displayed distance
    GameOver { final_score: u64 },
}
