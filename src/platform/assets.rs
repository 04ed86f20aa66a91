//! Sprite lookup by name
//!
//! The simulation only needs sprite sizes (hitboxes are derived from them);
//! hosts also use the colour to draw the placeholder rectangles.

use glam::Vec2;

use crate::sim::Hitboxes;

/// Size and fill colour of a sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteInfo {
    pub size: Vec2,
    /// 0xRRGGBB
    pub color: u32,
}

impl SpriteInfo {
    /// CSS colour string, e.g. `#3399cc`
    pub fn css_color(&self) -> String {
        format!("#{:06x}", self.color & 0xFF_FFFF)
    }
}

/// Opaque asset capability
pub trait AssetProvider {
    fn sprite(&self, name: &str) -> Option<SpriteInfo>;
}

pub const PLAYER_SPRITE: &str = "guy";
pub const PLATFORM_SPRITE: &str = "platform";
pub const SPIKE_SPRITE: &str = "spike";

/// Flat-coloured rectangles generated in code
#[derive(Debug, Default, Clone, Copy)]
pub struct ProceduralAssets;

impl AssetProvider for ProceduralAssets {
    fn sprite(&self, name: &str) -> Option<SpriteInfo> {
        match name {
            PLAYER_SPRITE => Some(SpriteInfo {
                size: Vec2::splat(50.0),
                color: 0x3399CC,
            }),
            PLATFORM_SPRITE => Some(SpriteInfo {
                size: Vec2::new(400.0, 20.0),
                color: 0x404040,
            }),
            SPIKE_SPRITE => Some(SpriteInfo {
                size: Vec2::splat(50.0),
                color: 0x404040,
            }),
            _ => None,
        }
    }
}

/// Collision boxes for the sprites a provider supplies. Missing sprites fall
/// back to the procedural sizes.
pub fn hitboxes(assets: &dyn AssetProvider) -> Hitboxes {
    let size_of = |name: &str| {
        assets
            .sprite(name)
            .or_else(|| ProceduralAssets.sprite(name))
            .map(|s| s.size)
            .unwrap_or(Vec2::splat(50.0))
    };
    Hitboxes::from_sprite_sizes(size_of(PLAYER_SPRITE), size_of(SPIKE_SPRITE))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BigSpikes;

    impl AssetProvider for BigSpikes {
        fn sprite(&self, name: &str) -> Option<SpriteInfo> {
            (name == SPIKE_SPRITE).then_some(SpriteInfo {
                size: Vec2::splat(80.0),
                color: 0xFF0000,
            })
        }
    }

    #[test]
    fn test_procedural_sprites() {
        let a = ProceduralAssets;
        assert_eq!(a.sprite("guy").unwrap().css_color(), "#3399cc");
        assert_eq!(a.sprite("platform").unwrap().size, Vec2::new(400.0, 20.0));
        assert!(a.sprite("coin").is_none());
    }

    #[test]
    fn test_hitboxes_follow_sprite_sizes() {
        assert_eq!(hitboxes(&ProceduralAssets), Hitboxes::default());

        let hb = hitboxes(&BigSpikes);
        assert_eq!(hb.player, Vec2::splat(20.0));
        assert_eq!(hb.spike, Vec2::splat(48.0));
    }
}
