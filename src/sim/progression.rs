//! Distance, phase and the speeds derived from them
//!
//! Raw score ticks up once per update. Displayed distance is score divided by
//! the distance factor, and every 100 units of distance is a new phase.
//! Obstacle speed and player velocity are pure functions of the phase, so they
//! step at phase boundaries instead of drifting with time.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A phase boundary crossed during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: u32,
    pub to: u32,
}

/// Progression parameters copied out of `Tuning` at session start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Curve {
    distance_factor: u64,
    phase_length: u64,
    base_speed: f32,
    milestone_boost: f32,
    player_velocity: f32,
    player_velocity_boost: f32,
}

/// Phase/progression controller for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    /// Raw update counter
    score: u64,
    /// Highest phase reached (never decreases)
    phase: u32,
    curve: Curve,
}

impl Progression {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            phase: 0,
            curve: Curve {
                distance_factor: tuning.distance_factor.max(1),
                phase_length: tuning.phase_length.max(1),
                base_speed: tuning.base_speed,
                milestone_boost: tuning.milestone_boost,
                player_velocity: tuning.player_velocity,
                player_velocity_boost: tuning.player_velocity_boost,
            },
        }
    }

    /// Count one update. Returns the phase change if a boundary was crossed.
    ///
    /// The phase is recomputed from distance rather than incremented, so a
    /// retuned curve that skips several boundaries in one tick still lands on
    /// the right phase (reported as a single change).
    pub fn tick(&mut self) -> Option<PhaseChange> {
        self.score += 1;
        let reached = self.phase_for_distance(self.display_distance());
        if reached > self.phase {
            let change = PhaseChange {
                from: self.phase,
                to: reached,
            };
            self.phase = reached;
            Some(change)
        } else {
            None
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Distance shown to the player (and the final score)
    pub fn display_distance(&self) -> u64 {
        self.score / self.curve.distance_factor
    }

    pub fn current_phase(&self) -> u32 {
        self.phase
    }

    /// Obstacle scroll speed (negative = leftward)
    pub fn current_speed(&self) -> f32 {
        self.speed_for_phase(self.phase)
    }

    /// Magnitude of the player's vertical velocity
    pub fn current_player_velocity(&self) -> f32 {
        self.player_velocity_for_phase(self.phase)
    }

    /// 1.0 at phase 0, +boost per phase
    pub fn speed_multiplier(&self) -> f32 {
        1.0 + self.phase as f32 * self.curve.milestone_boost
    }

    pub fn phase_for_distance(&self, distance: u64) -> u32 {
        (distance / self.curve.phase_length).min(u32::MAX as u64) as u32
    }

    pub fn speed_for_phase(&self, phase: u32) -> f32 {
        self.curve.base_speed * (1.0 + phase as f32 * self.curve.milestone_boost)
    }

    pub fn player_velocity_for_phase(&self, phase: u32) -> f32 {
        self.curve.player_velocity + phase as f32 * self.curve.player_velocity_boost
    }
}
