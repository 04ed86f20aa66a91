//! The per-run aggregate
//!
//! One `GameSession` holds everything a run mutates: progression, player,
//! obstacles, timers, RNG and the event queue. A restart builds a new one, so
//! nothing from the previous run (pending timers included) can leak forward.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::event::{FatalCause, GameEvent};
use super::obstacles::ObstacleManager;
use super::physics::Hitboxes;
use super::player::Player;
use super::progression::Progression;
use super::timer::Scheduler;
use crate::tuning::Tuning;

/// Whether the run is still live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    GameOver,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub hitboxes: Hitboxes,
    pub state: RunState,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub progression: Progression,
    pub player: Player,
    pub obstacles: ObstacleManager,
    pub scheduler: Scheduler,
    /// Events waiting for dispatch this tick
    pub(crate) queue: VecDeque<GameEvent>,
    /// What ended the run
    pub cause: Option<FatalCause>,
    final_score: Option<u64>,
}

impl GameSession {
    /// Start a run: fresh progression and player, warm-up spikes and spawn
    /// timer armed, clock at zero.
    pub fn new(seed: u64, tuning: Tuning, hitboxes: Hitboxes) -> Self {
        let progression = Progression::new(&tuning);
        let player = Player::new(progression.current_player_velocity());
        let mut scheduler = Scheduler::new();
        let mut obstacles = ObstacleManager::new();
        obstacles.schedule(&mut scheduler, &tuning);

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            hitboxes,
            state: RunState::Running,
            time_ticks: 0,
            progression,
            player,
            obstacles,
            scheduler,
            queue: VecDeque::new(),
            cause: None,
            final_score: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.state == RunState::GameOver
    }

    /// Session clock in milliseconds
    pub fn clock_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    /// Distance shown on the HUD
    pub fn distance(&self) -> u64 {
        self.progression.display_distance()
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// End the run. Freezes motion, cancels every pending timer and fixes the
    /// final score. Returns None if the run had already ended.
    pub fn end(&mut self, cause: FatalCause) -> Option<u64> {
        if self.is_over() {
            return None;
        }
        self.state = RunState::GameOver;
        self.cause = Some(cause);
        self.scheduler.cancel_all();
        self.player.freeze();
        self.queue.clear();

        let final_score = self.progression.display_distance();
        self.final_score = Some(final_score);
        log::info!("Run over ({:?}) at distance {}", cause, final_score);
        Some(final_score)
    }
}
