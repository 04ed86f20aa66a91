//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so a run can be retuned from
//! a JSON file without recompiling. Defaults match the shipped game.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Balance knobs for progression and obstacle spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Progression ===
    /// Raw ticks per unit of displayed distance
    pub distance_factor: u64,
    /// Displayed distance per phase
    pub phase_length: u64,
    /// Obstacle scroll speed at phase 0 (negative = leftward)
    pub base_speed: f32,
    /// Fractional speed increase per phase
    pub milestone_boost: f32,
    /// Player vertical speed at phase 0
    pub player_velocity: f32,
    /// Additive vertical speed per phase
    pub player_velocity_boost: f32,

    // === Spawning ===
    pub max_obstacles: usize,
    /// Cap at phase 0; grows by one per phase up to `max_obstacles`
    pub base_obstacle_cap: usize,
    pub base_spawn_delay_ms: f64,
    pub min_spawn_delay_ms: f64,
    pub spawn_delay_step_ms: f64,
    /// Minimum spacing between generator-path spawns
    pub generate_gate_ms: f64,
    pub spawn_x: f32,
    /// Phase from which paired floor/ceiling bursts may appear
    pub burst_min_phase: u32,
    pub burst_chance: f64,
    /// Horizontal gap between the two spikes of a burst
    pub burst_spacing: f32,
    pub cluster_base_chance: f64,
    pub cluster_chance_per_phase: f64,
    pub cluster_max_chance: f64,
    pub cluster_spacing: f32,

    // === Warm-up ===
    pub warmup_count: u32,
    /// First warm-up spike lands at `warmup_lead_ms + warmup_interval_ms`
    pub warmup_lead_ms: f64,
    pub warmup_interval_ms: f64,
    pub warmup_base_x: f32,
    pub warmup_spacing: f32,

    // === Player ===
    pub surface_debounce_ms: f64,

    /// Obstacles left of this x are evicted
    pub evict_x: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            distance_factor: DISTANCE_FACTOR,
            phase_length: PHASE_LENGTH,
            base_speed: BASE_SPEED,
            milestone_boost: MILESTONE_BOOST,
            player_velocity: PLAYER_VELOCITY,
            player_velocity_boost: PLAYER_VELOCITY_BOOST,

            max_obstacles: MAX_OBSTACLES,
            base_obstacle_cap: BASE_OBSTACLE_CAP,
            base_spawn_delay_ms: BASE_SPAWN_DELAY_MS,
            min_spawn_delay_ms: MIN_SPAWN_DELAY_MS,
            spawn_delay_step_ms: SPAWN_DELAY_STEP_MS,
            generate_gate_ms: GENERATE_GATE_MS,
            spawn_x: SPAWN_X,
            burst_min_phase: 2,
            burst_chance: 0.3,
            burst_spacing: 50.0,
            cluster_base_chance: 0.2,
            cluster_chance_per_phase: 0.1,
            cluster_max_chance: 0.7,
            cluster_spacing: 60.0,

            warmup_count: 3,
            warmup_lead_ms: 500.0,
            warmup_interval_ms: 500.0,
            warmup_base_x: 600.0,
            warmup_spacing: 300.0,

            surface_debounce_ms: SURFACE_DEBOUNCE_MS,

            evict_x: EVICT_X,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject values that would stall or divide by zero
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.distance_factor == 0 {
            return Err(TuningError::Invalid("distance_factor must be positive"));
        }
        if self.phase_length == 0 {
            return Err(TuningError::Invalid("phase_length must be positive"));
        }
        if self.min_spawn_delay_ms <= 0.0 || self.base_spawn_delay_ms <= 0.0 {
            return Err(TuningError::Invalid("spawn delays must be positive"));
        }
        let chances = [
            self.burst_chance,
            self.cluster_base_chance,
            self.cluster_chance_per_phase,
            self.cluster_max_chance,
        ];
        if chances.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(TuningError::Invalid("probabilities must lie in 0..=1"));
        }
        if self.surface_debounce_ms <= 0.0 {
            return Err(TuningError::Invalid("surface_debounce_ms must be positive"));
        }
        Ok(())
    }

    /// Spawn timer delay for a phase: 1500, 1300, ... floored at 500
    pub fn spawn_delay_for_phase(&self, phase: u32) -> f64 {
        (self.base_spawn_delay_ms - phase as f64 * self.spawn_delay_step_ms)
            .max(self.min_spawn_delay_ms)
    }

    /// Concurrent obstacle cap for a phase
    pub fn obstacle_cap_for_phase(&self, phase: u32) -> usize {
        self.max_obstacles
            .min(self.base_obstacle_cap.saturating_add(phase as usize))
    }

    /// Probability that a generator spawn is a multi-spike cluster
    pub fn cluster_chance_for_phase(&self, phase: u32) -> f64 {
        (self.cluster_base_chance + phase as f64 * self.cluster_chance_per_phase)
            .min(self.cluster_max_chance)
            .clamp(0.0, 1.0)
    }
}
