//! Level templates and per-attempt level instances
//!
//! A [`LevelTemplate`] is authored once and never mutated by the simulation.
//! Every attempt gets a fresh [`Level`] built with [`LevelTemplate::instantiate`],
//! so nothing the player does can leak back into the authored data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::{Enemy, Yarn};
use crate::consts::TILE_SIZE;

/// Visual theme of a level (also picks dust colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Kitchen,
    Garden,
    Roof,
    Castle,
}

/// Collision behaviour of a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Blocks from all four sides
    Solid,
    /// Blocks only when landed on from above
    OneWay,
}

/// Cosmetic surface texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Texture {
    Brick,
    Grass,
    Table,
    Ice,
    Stone,
}

impl Texture {
    /// Texture a tile gets in a given theme
    pub fn for_tile(theme: Theme, kind: PlatformKind, slippery: bool) -> Self {
        match theme {
            Theme::Garden => Texture::Grass,
            Theme::Castle => Texture::Stone,
            Theme::Kitchen if slippery => Texture::Ice,
            Theme::Kitchen if kind == PlatformKind::OneWay => Texture::Table,
            _ => Texture::Brick,
        }
    }
}

/// A static platform rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
    #[serde(default)]
    pub slippery: bool,
    #[serde(default)]
    pub texture: Option<Texture>,
}

impl Platform {
    pub fn solid(rect: Rect) -> Self {
        Self {
            rect,
            kind: PlatformKind::Solid,
            slippery: false,
            texture: None,
        }
    }

    pub fn one_way(rect: Rect) -> Self {
        Self {
            rect,
            kind: PlatformKind::OneWay,
            slippery: false,
            texture: None,
        }
    }

    #[inline]
    pub fn is_one_way(&self) -> bool {
        self.kind == PlatformKind::OneWay
    }
}

/// Per-level movement environment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPhysics {
    /// Horizontal velocity multiplier applied when no direction is held
    pub friction: f32,
    /// Constant horizontal drift added every tick (may be negative)
    pub wind: f32,
}

impl Default for LevelPhysics {
    fn default() -> Self {
        Self {
            friction: crate::consts::FRICTION_DEFAULT,
            wind: 0.0,
        }
    }
}

/// Immutable authored description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub theme: Theme,
    pub physics: LevelPhysics,
    pub player_start: Vec2,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub yarns: Vec<Yarn>,
    pub door: Rect,
    pub width: f32,
    pub height: f32,
}

impl LevelTemplate {
    /// Append the synthetic boundary platforms: a wall on each side and a
    /// ceiling far above the top row.
    pub fn with_world_bounds(mut self) -> Self {
        let (w, h) = (self.width, self.height);
        self.platforms
            .push(Platform::solid(Rect::new(-TILE_SIZE, 0.0, TILE_SIZE, h)));
        self.platforms
            .push(Platform::solid(Rect::new(w, 0.0, TILE_SIZE, h)));
        self.platforms
            .push(Platform::solid(Rect::new(0.0, -1000.0, w, TILE_SIZE)));
        self
    }

    /// Build a fresh mutable instance for one attempt
    pub fn instantiate(&self, index: usize) -> Level {
        Level {
            index,
            id: self.id,
            name: self.name.clone(),
            theme: self.theme,
            physics: self.physics,
            player_start: self.player_start,
            platforms: self.platforms.clone(),
            enemies: self.enemies.clone(),
            yarns: self.yarns.clone(),
            door: self.door,
            width: self.width,
            height: self.height,
        }
    }
}

/// Mutable level state for the current attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Position in the level list
    pub index: usize,
    pub id: u32,
    pub name: String,
    pub theme: Theme,
    pub physics: LevelPhysics,
    pub player_start: Vec2,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub yarns: Vec<Yarn>,
    pub door: Rect,
    pub width: f32,
    pub height: f32,
}

impl Level {
    pub fn collected_count(&self) -> usize {
        self.yarns.iter().filter(|y| y.collected).count()
    }

    /// True when nothing is left to pick up (vacuously for a level without yarn)
    pub fn all_collected(&self) -> bool {
        self.yarns.iter().all(|y| y.collected)
    }

    /// Collectibles needed before the door-open notice
    pub fn required_yarns(&self, target: usize) -> usize {
        target.min(self.yarns.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyKind;

    fn template() -> LevelTemplate {
        LevelTemplate {
            id: 7,
            name: "Test".into(),
            description: String::new(),
            theme: Theme::Garden,
            physics: LevelPhysics::default(),
            player_start: Vec2::new(40.0, 40.0),
            platforms: vec![Platform::solid(Rect::new(0.0, 160.0, 400.0, 40.0))],
            enemies: vec![Enemy::spawn(0, EnemyKind::GuardDog, 100.0, 128.0)],
            yarns: vec![Yarn::new(Rect::new(200.0, 100.0, 24.0, 24.0))],
            door: Rect::new(300.0, 80.0, 32.0, 80.0),
            width: 400.0,
            height: 200.0,
        }
    }

    #[test]
    fn test_world_bounds_added() {
        let t = template().with_world_bounds();
        assert_eq!(t.platforms.len(), 4);
        let left = &t.platforms[1].rect;
        let right = &t.platforms[2].rect;
        let ceiling = &t.platforms[3].rect;
        assert_eq!(left.right(), 0.0);
        assert_eq!(right.x, 400.0);
        assert_eq!(ceiling.y, -1000.0);
        assert_eq!(ceiling.w, 400.0);
    }

    #[test]
    fn test_instance_does_not_alias_template() {
        let t = template();
        let mut level = t.instantiate(0);
        level.yarns[0].collected = true;
        level.enemies[0].is_dead = true;
        level.enemies[0].rect.x += 50.0;

        assert!(!t.yarns[0].collected);
        assert!(!t.enemies[0].is_dead);
        assert_eq!(t.enemies[0].rect.x, 100.0);

        let fresh = t.instantiate(0);
        assert_eq!(fresh.collected_count(), 0);
    }

    #[test]
    fn test_texture_by_theme() {
        assert_eq!(
            Texture::for_tile(Theme::Kitchen, PlatformKind::Solid, true),
            Texture::Ice
        );
        assert_eq!(
            Texture::for_tile(Theme::Kitchen, PlatformKind::OneWay, false),
            Texture::Table
        );
        assert_eq!(
            Texture::for_tile(Theme::Roof, PlatformKind::Solid, false),
            Texture::Brick
        );
        assert_eq!(
            Texture::for_tile(Theme::Castle, PlatformKind::OneWay, false),
            Texture::Stone
        );
    }

    #[test]
    fn test_required_yarns_capped_by_count() {
        let level = template().instantiate(0);
        assert_eq!(level.required_yarns(3), 1);
    }
}
