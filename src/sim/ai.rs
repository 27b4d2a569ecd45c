//! Enemy behaviour state machines
//!
//! One machine per [`EnemyKind`]. [`think`] is pure: it takes an enemy by
//! reference and returns the enemy one tick later, so it can be tested
//! without a level or a game state.
//!
//! | Kind             | States                        |
//! |------------------|-------------------------------|
//! | Guard dog        | Sleep → Alert → Chase → Sleep |
//! | Ambush vegetable | Hidden → Surprise → Patrol    |
//! | Floating ghost   | Patrol (with vertical bob)    |
//! | Drone, flyer     | Patrol                        |

use super::geometry::Rect;
use super::state::{AiState, Enemy, EnemyKind};
use crate::tuning::Tuning;

/// Result of one AI tick
#[derive(Debug, Clone, PartialEq)]
pub struct AiOutcome {
    pub enemy: Enemy,
    /// The enemy finished its alert wind-up and started chasing this tick
    pub alerted: bool,
}

/// Advance one enemy by one tick.
///
/// `time_ms` is simulation time in milliseconds, used only for the ghost bob.
pub fn think(enemy: &Enemy, player: &Rect, time_ms: f32, tuning: &Tuning) -> AiOutcome {
    let mut next = enemy.clone();
    let mut alerted = false;

    if enemy.is_dead {
        return AiOutcome {
            enemy: next,
            alerted,
        };
    }

    let dist = enemy.rect.distance_to(player);

    match enemy.kind {
        EnemyKind::GuardDog => match enemy.state {
            AiState::Sleep if in_range(enemy, dist) => {
                next.state = AiState::Alert {
                    ticks_left: tuning.dog_alert_ticks,
                };
            }
            AiState::Alert { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                if ticks_left == 0 {
                    next.state = AiState::Chase;
                    alerted = true;
                } else {
                    next.state = AiState::Alert { ticks_left };
                }
            }
            AiState::Chase => {
                let dx = player.center().x - enemy.rect.center().x;
                next.direction = if dx > 0.0 { 1.0 } else { -1.0 };
                next.rect.x += next.speed * next.direction;
                if enemy.detection_range > 0.0 && dist > enemy.detection_range * 2.0 {
                    next.state = AiState::Sleep;
                }
            }
            _ => {}
        },

        EnemyKind::AmbushVegetable => match enemy.state {
            AiState::Hidden if in_range(enemy, dist) => {
                next.state = AiState::Surprise;
            }
            AiState::Surprise => {
                next.rect.y -= tuning.ambush_rise_speed;
                if next.rect.y < enemy.original_y - tuning.ambush_rise_height {
                    next.state = AiState::Patrol;
                }
            }
            AiState::Patrol => {
                patrol(&mut next);
                if next.rect.y < enemy.original_y {
                    next.rect.y = (next.rect.y + tuning.ambush_sink_speed).min(enemy.original_y);
                }
            }
            _ => {}
        },

        EnemyKind::FloatingGhost => {
            patrol(&mut next);
            let phase = time_ms / tuning.ghost_bob_period_ms;
            next.rect.y += phase.sin() * tuning.ghost_bob_amplitude;
        }

        EnemyKind::PatrolDrone | EnemyKind::FlyingPatroller => {
            patrol(&mut next);
        }
    }

    AiOutcome {
        enemy: next,
        alerted,
    }
}

/// Distance checks only apply to enemies with a detection range
#[inline]
fn in_range(enemy: &Enemy, dist: f32) -> bool {
    enemy.detection_range > 0.0 && dist < enemy.detection_range
}

/// Move along x and turn around at the patrol bounds
fn patrol(enemy: &mut Enemy) {
    enemy.rect.x += enemy.speed * enemy.direction;
    if enemy.rect.x <= enemy.patrol_start {
        enemy.direction = 1.0;
    } else if enemy.rect.x >= enemy.patrol_end {
        enemy.direction = -1.0;
    }
}
