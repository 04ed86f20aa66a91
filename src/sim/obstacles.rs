//! Spike obstacles: spawn policy, scrolling and eviction
//!
//! The manager is the only writer of the obstacle set. Spawns come from three
//! sources with different rules:
//! - warm-up: the three fixed opening spikes, no spacing gate
//! - paired burst: floor + ceiling together (phase 2+), no spacing gate
//! - generator: single spike or same-lane cluster, at least 800ms apart
//!
//! The per-phase concurrency cap gates the periodic path (bursts and the
//! generator). The opening sequence always completes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::physics::Aabb;
use super::timer::{Scheduler, TimerAction, TimerId};
use crate::consts::*;
use crate::tuning::Tuning;

/// Which track a spike sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lane {
    Floor,
    Ceiling,
}

impl Lane {
    pub fn y(self) -> f32 {
        match self {
            Lane::Floor => FLOOR_LANE_Y,
            Lane::Ceiling => CEILING_LANE_Y,
        }
    }

    /// Coin flip between the two lanes
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Lane::Floor
        } else {
            Lane::Ceiling
        }
    }
}

/// A spike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub lane: Lane,
}

impl Obstacle {
    pub fn hitbox(&self, size: Vec2) -> Aabb {
        Aabb::new(self.pos, size)
    }
}

/// Owns the live obstacle set and the spawn timer
#[derive(Debug, Clone, Default)]
pub struct ObstacleManager {
    /// Live obstacles (in spawn order)
    obstacles: Vec<Obstacle>,
    next_id: u32,
    spawn_timer: Option<TimerId>,
    spawn_delay_ms: f64,
    /// Session clock of the last generator-path spawn
    last_generated_ms: Option<f64>,
}

impl ObstacleManager {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn active_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Current spawn timer interval
    pub fn spawn_delay_ms(&self) -> f64 {
        self.spawn_delay_ms
    }

    /// Arm the warm-up sequence and the periodic generator
    pub fn schedule(&mut self, scheduler: &mut Scheduler, tuning: &Tuning) {
        for index in 1..=tuning.warmup_count {
            let delay = tuning.warmup_lead_ms + index as f64 * tuning.warmup_interval_ms;
            scheduler.delayed_call(delay, TimerAction::WarmupSpawn { index });
        }
        self.spawn_delay_ms = tuning.base_spawn_delay_ms;
        self.spawn_timer = Some(scheduler.periodic(self.spawn_delay_ms, TimerAction::SpawnCycle));
    }

    /// Tighten the spawn cadence for a new phase. Returns the new delay.
    pub fn retune(&mut self, scheduler: &mut Scheduler, tuning: &Tuning, phase: u32) -> f64 {
        self.spawn_delay_ms = tuning.spawn_delay_for_phase(phase);
        if let Some(id) = self.spawn_timer {
            scheduler.set_interval(id, self.spawn_delay_ms);
        }
        self.spawn_delay_ms
    }

    /// Place one spike. No policy checks.
    pub fn spawn_one(&mut self, lane: Lane, x: f32) -> Obstacle {
        let obstacle = Obstacle {
            id: self.next_id,
            pos: Vec2::new(x, lane.y()),
            lane,
        };
        self.next_id += 1;
        self.obstacles.push(obstacle);
        obstacle
    }

    /// Floor spike at `x` plus ceiling spike at `x + spacing`
    pub fn spawn_burst(&mut self, x: f32, spacing: f32) -> [Obstacle; 2] {
        [
            self.spawn_one(Lane::Floor, x),
            self.spawn_one(Lane::Ceiling, x + spacing),
        ]
    }

    /// Opening spike `index` (1-based), in a random lane
    pub fn spawn_warmup<R: Rng + ?Sized>(
        &mut self,
        tuning: &Tuning,
        index: u32,
        rng: &mut R,
    ) -> Obstacle {
        let x = tuning.warmup_base_x + index as f32 * tuning.warmup_spacing;
        self.spawn_one(Lane::random(rng), x)
    }

    /// Periodic timer callback: cap check, then burst or generator
    pub fn spawn_cycle<R: Rng + ?Sized>(
        &mut self,
        tuning: &Tuning,
        phase: u32,
        now_ms: f64,
        rng: &mut R,
    ) -> Vec<Obstacle> {
        let cap = tuning.obstacle_cap_for_phase(phase);
        let active = self.active_count();
        if active >= cap {
            return Vec::new();
        }
        let free = cap - active;

        if phase >= tuning.burst_min_phase && free >= 2 && rng.random_bool(tuning.burst_chance) {
            return self.spawn_burst(tuning.spawn_x, tuning.burst_spacing).to_vec();
        }

        self.generate(tuning, phase, now_ms, free, rng)
    }

    /// Generator path: single spike or a same-lane cluster of 2-3, never more
    /// than `free` spikes, and never within the spacing gate of the last one.
    fn generate<R: Rng + ?Sized>(
        &mut self,
        tuning: &Tuning,
        phase: u32,
        now_ms: f64,
        free: usize,
        rng: &mut R,
    ) -> Vec<Obstacle> {
        if let Some(last) = self.last_generated_ms {
            if now_ms - last < tuning.generate_gate_ms {
                return Vec::new();
            }
        }
        self.last_generated_ms = Some(now_ms);

        let x = tuning.spawn_x;
        if rng.random_bool(tuning.cluster_chance_for_phase(phase)) {
            let size: usize = if rng.random_bool(0.5) { 2 } else { 3 };
            let lane = Lane::random(rng);
            (0..size.min(free))
                .map(|i| self.spawn_one(lane, x + i as f32 * tuning.cluster_spacing))
                .collect()
        } else {
            vec![self.spawn_one(Lane::random(rng), x)]
        }
    }

    /// Scroll every obstacle by `speed * dt`
    pub fn advance(&mut self, speed: f32, dt: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.pos.x += speed * dt;
        }
    }

    /// Drop obstacles left of `bound`. Returns the evicted ids.
    pub fn evict_offscreen(&mut self, bound: f32) -> Vec<u32> {
        let mut evicted = Vec::new();
        self.obstacles.retain(|o| {
            if o.pos.x < bound {
                evicted.push(o.id);
                false
            } else {
                true
            }
        });
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_one_uses_lane_y() {
        let mut m = ObstacleManager::new();
        let floor = m.spawn_one(Lane::Floor, 900.0);
        let ceiling = m.spawn_one(Lane::Ceiling, 900.0);
        assert_eq!(floor.pos, Vec2::new(900.0, FLOOR_LANE_Y));
        assert_eq!(ceiling.pos, Vec2::new(900.0, CEILING_LANE_Y));
        assert_ne!(floor.id, ceiling.id);
        assert_eq!(m.active_count(), 2);
    }

    #[test]
    fn test_burst_covers_both_lanes() {
        let mut m = ObstacleManager::new();
        let [a, b] = m.spawn_burst(900.0, 50.0);
        assert_eq!(a.lane, Lane::Floor);
        assert_eq!(b.lane, Lane::Ceiling);
        assert_eq!(b.pos.x - a.pos.x, 50.0);
    }

    #[test]
    fn test_advance_and_evict() {
        let mut m = ObstacleManager::new();
        let o = m.spawn_one(Lane::Floor, 900.0);
        m.advance(-300.0, 0.5);
        assert_eq!(m.obstacles()[0].pos.x, 750.0);

        // Exactly at the bound survives
        m.obstacles[0].pos.x = -50.0;
        assert!(m.evict_offscreen(EVICT_X).is_empty());

        m.advance(-300.0, 0.01);
        assert_eq!(m.evict_offscreen(EVICT_X), vec![o.id]);
        assert_eq!(m.active_count(), 0);
    }

    #[test]
    fn test_warmup_ignores_cap() {
        let tuning = Tuning::default();
        let mut m = ObstacleManager::new();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..3 {
            m.spawn_one(Lane::Floor, 900.0);
        }
        assert_eq!(m.spawn_warmup(&tuning, 3, &mut rng).pos.x, 1500.0);
        assert_eq!(m.active_count(), 4);
    }

    #[test]
    fn test_cycle_skips_when_cap_full() {
        let tuning = Tuning::default();
        let mut m = ObstacleManager::new();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..3 {
            m.spawn_one(Lane::Floor, 900.0);
        }
        assert!(m.spawn_cycle(&tuning, 0, 10_000.0, &mut rng).is_empty());
        assert_eq!(m.active_count(), 3);
    }

    #[test]
    fn test_generator_gate_applies_only_to_generator() {
        let tuning = Tuning {
            cluster_base_chance: 0.0,
            cluster_max_chance: 0.0,
            ..Tuning::default()
        };
        let mut m = ObstacleManager::new();
        let mut rng = Pcg32::seed_from_u64(1);

        assert_eq!(m.spawn_cycle(&tuning, 0, 1500.0, &mut rng).len(), 1);
        // 700ms later: gated
        assert!(m.spawn_cycle(&tuning, 0, 2200.0, &mut rng).is_empty());
        // Warm-up ignores the gate
        assert_eq!(m.spawn_warmup(&tuning, 1, &mut rng).pos.x, 900.0);
        // 800ms after the last generator spawn: allowed (cap 3, 2 active)
        assert_eq!(m.spawn_cycle(&tuning, 0, 2300.0, &mut rng).len(), 1);
    }

    #[test]
    fn test_bursts_bypass_gate() {
        let tuning = Tuning {
            burst_chance: 1.0,
            ..Tuning::default()
        };
        let mut m = ObstacleManager::new();
        let mut rng = Pcg32::seed_from_u64(3);

        assert_eq!(m.spawn_cycle(&tuning, 2, 1000.0, &mut rng).len(), 2);
        assert_eq!(m.spawn_cycle(&tuning, 2, 1001.0, &mut rng).len(), 2);
        assert_eq!(m.active_count(), 4);
    }

    #[test]
    fn test_no_burst_before_phase_two() {
        let tuning = Tuning {
            burst_chance: 1.0,
            cluster_base_chance: 0.0,
            cluster_max_chance: 0.0,
            ..Tuning::default()
        };
        let mut m = ObstacleManager::new();
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(m.spawn_cycle(&tuning, 1, 1000.0, &mut rng).len(), 1);
    }

    #[test]
    fn test_cluster_shares_lane_and_spacing() {
        let tuning = Tuning {
            cluster_base_chance: 1.0,
            cluster_max_chance: 1.0,
            ..Tuning::default()
        };
        let mut m = ObstacleManager::new();
        let mut rng = Pcg32::seed_from_u64(11);
        let spawned = m.spawn_cycle(&tuning, 4, 1000.0, &mut rng);
        assert!(spawned.len() == 2 || spawned.len() == 3);
        for (i, o) in spawned.iter().enumerate() {
            assert_eq!(o.lane, spawned[0].lane);
            assert_eq!(o.pos.x, 900.0 + i as f32 * 60.0);
        }
    }

    #[test]
    fn test_cluster_truncated_to_free_slots() {
        let tuning = Tuning {
            cluster_base_chance: 1.0,
            cluster_max_chance: 1.0,
            ..Tuning::default()
        };
        let mut m = ObstacleManager::new();
        let mut rng = Pcg32::seed_from_u64(5);
        m.spawn_one(Lane::Floor, 500.0);
        m.spawn_one(Lane::Floor, 600.0);
        // Phase 0 cap is 3: only one slot left
        assert_eq!(m.spawn_cycle(&tuning, 0, 1000.0, &mut rng).len(), 1);
        assert_eq!(m.active_count(), 3);
    }

    #[test]
    fn test_retune_tightens_timer() {
        let tuning = Tuning::default();
        let mut s = Scheduler::new();
        let mut m = ObstacleManager::new();
        m.schedule(&mut s, &tuning);
        assert_eq!(m.spawn_delay_ms(), 1500.0);
        // warm-up x3 + periodic
        assert_eq!(s.pending(), 4);

        assert_eq!(m.retune(&mut s, &tuning, 3), 900.0);
        assert_eq!(m.retune(&mut s, &tuning, 9), 500.0);
    }

    proptest! {
        #[test]
        fn prop_cycle_never_fills_past_cap(
            seed: u64,
            phase in 0u32..8,
            steps in proptest::collection::vec((0.0f64..2000.0, any::<bool>(), 0u32..4), 1..60),
        ) {
            let tuning = Tuning::default();
            let cap = tuning.obstacle_cap_for_phase(phase);
            let mut m = ObstacleManager::new();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut now = 0.0;

            for (dt, warmup, evict) in steps {
                now += dt;
                if warmup {
                    m.spawn_warmup(&tuning, 1, &mut rng);
                } else {
                    let before = m.active_count();
                    m.spawn_cycle(&tuning, phase, now, &mut rng);
                    if before < cap {
                        prop_assert!(m.active_count() <= cap.min(7));
                    } else {
                        prop_assert_eq!(m.active_count(), before);
                    }
                }

                for _ in 0..evict {
                    if let Some(first) = m.obstacles.first_mut() {
                        first.pos.x = -100.0;
                    }
                    m.evict_offscreen(EVICT_X);
                }
            }
        }

        #[test]
        fn prop_scroll_is_linear(x0 in 0.0f32..1000.0, t in 0.0f32..2.0) {
            let mut m = ObstacleManager::new();
            m.spawn_one(Lane::Ceiling, x0);
            m.advance(-360.0, t);
            prop_assert!((m.obstacles()[0].pos.x - (x0 - 360.0 * t)).abs() < 1e-2);
        }
    }
}
