//! Player state machine: {floor, ceiling} x {on surface, airborne}
//!
//! The player never moves horizontally. Vertically it travels at the
//! phase-derived velocity toward whichever surface it currently targets
//! (positive y is down). Contact clamps it onto the surface; a flip is only
//! accepted while in contact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Aabb;
use super::timer::{Scheduler, TimerAction, TimerId};
use crate::consts::*;

/// Which platform the player targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Floor,
    Ceiling,
}

impl Surface {
    pub fn opposite(self) -> Self {
        match self {
            Surface::Floor => Surface::Ceiling,
            Surface::Ceiling => Surface::Floor,
        }
    }

    /// Sign of the velocity that moves toward this surface
    pub fn direction(self) -> f32 {
        match self {
            Surface::Floor => 1.0,
            Surface::Ceiling => -1.0,
        }
    }

    /// Player centre y while resting on this surface
    pub fn rest_y(self) -> f32 {
        match self {
            Surface::Floor => FLOOR_Y - SURFACE_OFFSET,
            Surface::Ceiling => CEILING_Y + SURFACE_OFFSET,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Floor => "floor",
            Surface::Ceiling => "ceiling",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Vertical velocity (units/s, positive = down)
    pub vel_y: f32,
    pub is_ceiling: bool,
    pub is_on_surface: bool,
    /// Pending surface debounce check
    #[serde(skip)]
    debounce: Option<TimerId>,
}

impl Player {
    /// Fresh player at the spawn point, heading for the floor
    pub fn new(velocity: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, PLAYER_START_Y),
            vel_y: velocity,
            is_ceiling: false,
            is_on_surface: false,
            debounce: None,
        }
    }

    pub fn surface(&self) -> Surface {
        if self.is_ceiling {
            Surface::Ceiling
        } else {
            Surface::Floor
        }
    }

    pub fn hitbox(&self, size: Vec2) -> Aabb {
        Aabb::new(self.pos, size)
    }

    /// Platform contact: settle onto the targeted surface and re-arm the
    /// debounce check. Returns true if the player was airborne before.
    pub fn on_surface_contact(
        &mut self,
        velocity: f32,
        scheduler: &mut Scheduler,
        debounce_ms: f64,
    ) -> bool {
        let landed = !self.is_on_surface;
        self.is_on_surface = true;

        if let Some(id) = self.debounce.take() {
            scheduler.cancel(id);
        }
        self.debounce = Some(scheduler.delayed_call(debounce_ms, TimerAction::SurfaceDebounce));

        let surface = self.surface();
        self.pos.y = surface.rest_y();
        self.vel_y = surface.direction() * velocity;
        landed
    }

    /// Debounce expired. Drops to airborne unless a platform still overlaps.
    /// Returns true if contact was lost.
    pub fn on_debounce(&mut self, still_touching: bool) -> bool {
        self.debounce = None;
        if still_touching || !self.is_on_surface {
            return false;
        }
        self.is_on_surface = false;
        true
    }

    /// Flip gravity. Ignored (returns None) while airborne.
    pub fn flip(&mut self, velocity: f32) -> Option<Surface> {
        if !self.is_on_surface {
            return None;
        }
        self.is_ceiling = !self.is_ceiling;
        let surface = self.surface();
        self.vel_y = surface.direction() * velocity;
        Some(surface)
    }

    /// Keep a resting player's velocity in step with the current phase
    pub fn enforce_surface_velocity(&mut self, velocity: f32) {
        if self.is_on_surface {
            self.vel_y = self.surface().direction() * velocity;
        }
    }

    pub fn integrate(&mut self, dt: f32) {
        self.pos.y += self.vel_y * dt;
    }

    /// Vertical position outside the visible range
    pub fn out_of_bounds(&self) -> bool {
        self.pos.y < 0.0 || self.pos.y > SCREEN_HEIGHT
    }

    /// Stop all motion (game over)
    pub fn freeze(&mut self) {
        self.vel_y = 0.0;
        self.debounce = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grounded() -> (Player, Scheduler) {
        let mut s = Scheduler::new();
        let mut p = Player::new(300.0);
        p.on_surface_contact(300.0, &mut s, 100.0);
        (p, s)
    }

    #[test]
    fn test_spawns_falling_toward_floor() {
        let p = Player::new(300.0);
        assert_eq!(p.pos, Vec2::new(100.0, 380.0));
        assert_eq!(p.vel_y, 300.0);
        assert!(!p.is_ceiling);
        assert!(!p.is_on_surface);
    }

    #[test]
    fn test_contact_clamps_and_sets_velocity() {
        let (p, s) = grounded();
        assert!(p.is_on_surface);
        assert_eq!(p.pos.y, FLOOR_Y - SURFACE_OFFSET);
        assert_eq!(p.vel_y, 300.0);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn test_repeated_contact_rearms_single_debounce() {
        let (mut p, mut s) = grounded();
        assert!(!p.on_surface_contact(300.0, &mut s, 100.0));
        assert!(!p.on_surface_contact(300.0, &mut s, 100.0));
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn test_flip_from_floor() {
        let (mut p, _s) = grounded();
        assert_eq!(p.flip(315.0), Some(Surface::Ceiling));
        assert!(p.is_ceiling);
        assert_eq!(p.vel_y, -315.0);
    }

    #[test]
    fn test_ceiling_contact_clamps_below_ceiling() {
        let (mut p, mut s) = grounded();
        p.flip(300.0);
        p.on_surface_contact(300.0, &mut s, 100.0);
        assert_eq!(p.pos.y, CEILING_Y + SURFACE_OFFSET);
        assert_eq!(p.vel_y, -300.0);
    }

    #[test]
    fn test_flip_while_airborne_is_ignored() {
        let mut p = Player::new(300.0);
        let before = p.clone();
        assert_eq!(p.flip(300.0), None);
        assert_eq!(p.is_ceiling, before.is_ceiling);
        assert_eq!(p.vel_y, before.vel_y);
    }

    #[test]
    fn test_debounce_keeps_contact_while_overlapping() {
        let (mut p, _s) = grounded();
        assert!(!p.on_debounce(true));
        assert!(p.is_on_surface);
        assert!(p.on_debounce(false));
        assert!(!p.is_on_surface);
    }

    #[test]
    fn test_enforce_velocity_only_on_surface() {
        let mut p = Player::new(300.0);
        p.vel_y = 123.0;
        p.enforce_surface_velocity(330.0);
        assert_eq!(p.vel_y, 123.0);

        let (mut p, _s) = grounded();
        p.enforce_surface_velocity(330.0);
        assert_eq!(p.vel_y, 330.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut p = Player::new(300.0);
        assert!(!p.out_of_bounds());
        p.pos.y = 601.0;
        assert!(p.out_of_bounds());
        p.pos.y = -1.0;
        assert!(p.out_of_bounds());
    }

    proptest! {
        #[test]
        fn prop_flip_toggles_iff_on_surface(on_surface: bool, is_ceiling: bool, v in 1.0f32..1000.0) {
            let mut p = Player::new(300.0);
            p.is_on_surface = on_surface;
            p.is_ceiling = is_ceiling;
            let vel_before = p.vel_y;

            let result = p.flip(v);

            if on_surface {
                prop_assert!(result.is_some());
                prop_assert_eq!(p.is_ceiling, !is_ceiling);
                prop_assert_eq!(p.vel_y, p.surface().direction() * v);
            } else {
                prop_assert!(result.is_none());
                prop_assert_eq!(p.is_ceiling, is_ceiling);
                prop_assert_eq!(p.vel_y, vel_before);
            }
        }
    }
}
