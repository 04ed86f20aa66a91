//! Arcade physics: axis-aligned boxes and contact detection
//!
//! The player is the only moving body that can collide. Each tick it is
//! integrated vertically, then tested against the two platforms (surface
//! contact), every spike (fatal) and the screen bounds (fatal), in that order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{FatalCause, GameEvent};
use super::obstacles::Obstacle;
use super::player::{Player, Surface};
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Strict overlap: boxes that merely share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }
}

/// Collision box sizes for a session, derived from sprite sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitboxes {
    pub player: Vec2,
    pub spike: Vec2,
    pub platform: Vec2,
}

impl Default for Hitboxes {
    fn default() -> Self {
        Self::from_sprite_sizes(Vec2::splat(50.0), Vec2::splat(50.0))
    }
}

impl Hitboxes {
    /// Scale sprites and shrink them by the per-side inset, which makes
    /// grazes forgiving
    pub fn from_sprite_sizes(player_sprite: Vec2, spike_sprite: Vec2) -> Self {
        let shrink = |sprite: Vec2, inset: f32, scale: f32| {
            ((sprite - Vec2::splat(inset * 2.0)) * scale).max(Vec2::splat(1.0))
        };
        Self {
            player: shrink(player_sprite, PLAYER_HITBOX_INSET, PLAYER_SCALE),
            spike: shrink(spike_sprite, SPIKE_HITBOX_INSET, SPIKE_SCALE),
            platform: Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        }
    }

    pub fn platform_box(&self, surface: Surface) -> Aabb {
        let y = match surface {
            Surface::Floor => FLOOR_Y,
            Surface::Ceiling => CEILING_Y,
        };
        Aabb::new(Vec2::new(PLATFORM_CENTER_X, y), self.platform)
    }
}

/// Platform the box currently overlaps, floor first
pub fn touching_platform(body: &Aabb, hitboxes: &Hitboxes) -> Option<Surface> {
    [Surface::Floor, Surface::Ceiling]
        .into_iter()
        .find(|&s| body.overlaps(&hitboxes.platform_box(s)))
}

/// Contacts for the player's current position, in resolution order
pub fn detect_collisions(
    player: &Player,
    obstacles: &[Obstacle],
    hitboxes: &Hitboxes,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let body = player.hitbox(hitboxes.player);

    if let Some(surface) = touching_platform(&body, hitboxes) {
        events.push(GameEvent::SurfaceContacted { surface });
    }

    if let Some(hit) = obstacles
        .iter()
        .find(|o| body.overlaps(&o.hitbox(hitboxes.spike)))
    {
        events.push(GameEvent::FatalCollision {
            cause: FatalCause::Obstacle { id: hit.id },
        });
    }

    if player.out_of_bounds() {
        events.push(GameEvent::FatalCollision {
            cause: FatalCause::OutOfBounds,
        });
    }

    events
}
