//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers driven by the session clock, never wall time
//! - No rendering or platform dependencies

pub mod event;
pub mod obstacles;
pub mod physics;
pub mod player;
pub mod progression;
pub mod state;
pub mod tick;
pub mod timer;

pub use event::{FatalCause, GameEvent};
pub use obstacles::{Lane, Obstacle, ObstacleManager};
pub use physics::{Aabb, Hitboxes, detect_collisions, touching_platform};
pub use player::{Player, Surface};
pub use progression::{PhaseChange, Progression};
pub use state::{GameSession, RunState};
pub use tick::{TickInput, tick};
pub use timer::{Scheduler, TimerAction, TimerId};
