//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (authored order for platforms, enemies, yarn)
//! - No rendering, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod driver;
pub mod geometry;
pub mod interact;
pub mod level;
pub mod particles;
pub mod state;
pub mod tick;

pub use ai::{AiOutcome, think};
pub use collision::{CollisionFlags, resolve_platforms};
pub use driver::FixedStep;
pub use geometry::{Rect, distance, intersects};
pub use level::{Level, LevelPhysics, LevelTemplate, Platform, PlatformKind, Texture, Theme};
pub use particles::{Particle, ParticleKind};
pub use state::{
    AiState, DefeatCause, Enemy, EnemyKind, GameEvent, GameState, GameStatus, Player, Scheduled,
    ScheduledAction, Yarn,
};
pub use tick::{TickInput, tick};
