//! Yarn Dash - A tile-based side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, enemy AI, interactions)
//! - `levels`: Text-grid level parser and the built-in level set
//! - `persistence`: Highest-unlocked-level progress record
//! - `settings`: Player preferences (mute, particle quality)
//! - `tuning`: Data-driven game balance

pub mod levels;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use persistence::Progress;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Level grid cell size in pixels
    pub const TILE_SIZE: f32 = 40.0;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;

    /// Default per-level friction (multiplier applied to vx with no input)
    pub const FRICTION_DEFAULT: f32 = 0.8;
    /// Friction on ice levels
    pub const FRICTION_ICE: f32 = 0.96;

    /// Collectibles needed to unlock the exit
    pub const YARNS_PER_LEVEL: usize = 3;
}
