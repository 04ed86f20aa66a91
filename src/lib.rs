//! Gravity Flip - a one-button floor/ceiling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (progression, player, obstacles, timers)
//! - `session`: Session lifecycle, high score and scoreboard plumbing
//! - `platform`: Collaborator seams (scoreboard, storage, audio, assets, input)
//! - `persistence`: High score stores
//! - `tuning`: Data-driven game balance
//! - `ui`: HUD snapshot and text formatting

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::Leaderboard;
pub use session::{SessionController, SessionState};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per displayed frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta handed to the sim (tab-switch hiccups)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Platform centre lines
    pub const FLOOR_Y: f32 = 400.0;
    pub const CEILING_Y: f32 = 200.0;
    /// Platforms span the screen: 400 wide texture scaled x2
    pub const PLATFORM_WIDTH: f32 = 800.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const PLATFORM_CENTER_X: f32 = 400.0;

    /// Player spawn (just above the floor)
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 380.0;
    pub const PLAYER_SCALE: f32 = 0.5;
    /// Hitbox inset per side, in texture pixels (before scaling)
    pub const PLAYER_HITBOX_INSET: f32 = 5.0;
    /// Distance from a platform centre line to the clamped player centre
    pub const SURFACE_OFFSET: f32 = 25.0;

    /// Obstacle lanes
    pub const FLOOR_LANE_Y: f32 = 380.0;
    pub const CEILING_LANE_Y: f32 = 220.0;
    pub const SPIKE_SCALE: f32 = 0.8;
    pub const SPIKE_HITBOX_INSET: f32 = 10.0;

    /// Progression defaults
    pub const DISTANCE_FACTOR: u64 = 5;
    pub const PHASE_LENGTH: u64 = 100;
    pub const BASE_SPEED: f32 = -300.0;
    pub const MILESTONE_BOOST: f32 = 0.20;
    pub const PLAYER_VELOCITY: f32 = 300.0;
    pub const PLAYER_VELOCITY_BOOST: f32 = 15.0;

    /// Obstacle defaults
    pub const MAX_OBSTACLES: usize = 7;
    pub const BASE_OBSTACLE_CAP: usize = 3;
    pub const SPAWN_X: f32 = 900.0;
    pub const EVICT_X: f32 = -50.0;

    /// Timer defaults (milliseconds)
    pub const BASE_SPAWN_DELAY_MS: f64 = 1500.0;
    pub const MIN_SPAWN_DELAY_MS: f64 = 500.0;
    pub const SPAWN_DELAY_STEP_MS: f64 = 200.0;
    pub const GENERATE_GATE_MS: f64 = 800.0;
    pub const SURFACE_DEBOUNCE_MS: f64 = 100.0;

    /// Distance at which the controls hint fades out
    pub const CONTROLS_HINT_DISTANCE: u64 = 25;
}
