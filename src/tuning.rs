//! Data-driven game balance
//!
//! Every number the simulation uses for movement, combat, scoring and
//! scheduling lives here. All velocities are pixels per tick, all durations
//! are ticks at [`SIM_DT`](crate::consts::SIM_DT).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    pub gravity: f32,
    /// Initial jump velocity (negative is up)
    pub jump_force: f32,
    /// Horizontal speed cap
    pub move_speed: f32,
    /// Horizontal acceleration while a direction is held
    pub accel: f32,
    /// Max fall speed while wall-sliding
    pub wall_slide_speed: f32,
    /// Wall jump kick (x away from wall, y up)
    pub wall_jump_force: Vec2,

    // === Combat ===
    pub scratch_duration: u32,
    pub invulnerability_ticks: u32,
    pub max_lives: u8,
    /// Width of the forward scratch hitbox
    pub attack_width: f32,
    /// Slack below an enemy's midline that still counts as a stomp
    pub stomp_tolerance: f32,
    /// Fraction of jump force applied as bounce after a stomp
    pub stomp_bounce: f32,

    // === Scoring ===
    pub yarn_score: u64,
    pub enemy_score: u64,
    pub level_bonus: u64,
    pub yarns_to_unlock: usize,

    // === World ===
    /// How far below the level the player may fall before dying
    pub fall_margin: f32,

    // === Scheduling ===
    pub respawn_delay_ticks: u32,
    pub advance_delay_ticks: u32,
    pub notice_ticks: u32,

    // === Enemy AI ===
    pub dog_alert_ticks: u32,
    pub ambush_rise_speed: f32,
    pub ambush_rise_height: f32,
    pub ambush_sink_speed: f32,
    pub ghost_bob_amplitude: f32,
    /// Milliseconds of sim time per radian of ghost bob phase
    pub ghost_bob_period_ms: f32,

    // === Particles ===
    pub particle_gravity: f32,
    /// Share of level wind that drifts particles
    pub particle_wind_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_force: -13.5,
            move_speed: 6.0,
            accel: 0.8,
            wall_slide_speed: 2.0,
            wall_jump_force: Vec2::new(10.0, -12.0),

            scratch_duration: 15,
            invulnerability_ticks: 60,
            max_lives: 9,
            attack_width: 30.0,
            stomp_tolerance: 10.0,
            stomp_bounce: 0.6,

            yarn_score: 100,
            enemy_score: 50,
            level_bonus: 500,
            yarns_to_unlock: crate::consts::YARNS_PER_LEVEL,

            fall_margin: 100.0,

            respawn_delay_ticks: 60,
            advance_delay_ticks: 180,
            notice_ticks: 180,

            dog_alert_ticks: 30,
            ambush_rise_speed: 5.0,
            ambush_rise_height: 80.0,
            ambush_sink_speed: 2.0,
            ghost_bob_amplitude: 1.5,
            ghost_bob_period_ms: 200.0,

            particle_gravity: 0.2,
            particle_wind_factor: 0.5,
        }
    }
}

impl Tuning {
    /// Parse tuning JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.move_speed > 0.0) {
            return Err(TuningError::Invalid {
                field: "move_speed",
                reason: "must be positive",
            });
        }
        if !(self.jump_force < 0.0) {
            return Err(TuningError::Invalid {
                field: "jump_force",
                reason: "must be negative (upward)",
            });
        }
        if self.gravity < 0.0 {
            return Err(TuningError::Invalid {
                field: "gravity",
                reason: "must not be negative",
            });
        }
        if self.max_lives == 0 {
            return Err(TuningError::Invalid {
                field: "max_lives",
                reason: "must be at least 1",
            });
        }
        if !(0.0..=1.0).contains(&self.stomp_bounce) {
            return Err(TuningError::Invalid {
                field: "stomp_bounce",
                reason: "must be within 0..=1",
            });
        }
        if self.ghost_bob_period_ms <= 0.0 {
            return Err(TuningError::Invalid {
                field: "ghost_bob_period_ms",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}
