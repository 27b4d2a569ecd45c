//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically:
//! scheduled transitions → enemy AI → player physics → interactions.

use glam::Vec2;

use super::ai;
use super::collision::{Motion, step_player};
use super::interact;
use super::particles::{self, ParticleKind};
use super::state::{GameEvent, GameState, GameStatus, ScheduledAction};
use crate::consts::SIM_DT;

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Held, not edge-triggered: holding jump re-jumps on landing
    pub jump: bool,
    pub attack: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    run_schedule(state);

    if state.status != GameStatus::Playing || state.level.is_none() {
        return;
    }

    think_enemies(state);

    let Some(level) = state.level.as_ref() else {
        return;
    };
    let wind = level.physics.wind;
    let motion = step_player(&mut state.player, level, input, &state.tuning);
    apply_motion(state, motion);

    interact::collect_yarn(state);
    interact::resolve_enemy_contact(state);

    particles::integrate(&mut state.particles, wind, &state.tuning);
    interact::tick_timers(&mut state.player);

    interact::check_exit(state);
}

/// Count down scheduled transitions and fire the due ones. Entries from an
/// older epoch belong to a level that is gone and are dropped unfired.
fn run_schedule(state: &mut GameState) {
    let epoch = state.epoch;
    let mut due = Vec::new();
    state.schedule.retain_mut(|s| {
        if s.epoch != epoch {
            log::debug!("Dropping stale {:?}", s.action);
            return false;
        }
        s.ticks_left = s.ticks_left.saturating_sub(1);
        if s.ticks_left == 0 {
            due.push(s.action);
            false
        } else {
            true
        }
    });

    for action in due {
        // An earlier action this tick may have loaded a new level
        if state.epoch != epoch {
            break;
        }
        match action {
            ScheduledAction::Respawn => {
                if state.status == GameStatus::Playing && state.player.dead {
                    state.respawn();
                }
            }
            ScheduledAction::AdvanceLevel { next } => {
                if state.status == GameStatus::LevelComplete && state.load_level(next) {
                    state.status = GameStatus::Playing;
                }
            }
            ScheduledAction::HideNotice => {
                state.show_door_notice = false;
                state.emit(GameEvent::NoticeHidden);
            }
        }
    }
}

fn think_enemies(state: &mut GameState) {
    let time_ms = state.time_ticks as f32 * SIM_DT * 1000.0;
    let body = state.player.rect();
    let Some(level) = state.level.as_mut() else {
        return;
    };

    let mut alerted = Vec::new();
    for enemy in level.enemies.iter_mut().filter(|e| !e.is_dead) {
        let outcome = ai::think(enemy, &body, time_ms, &state.tuning);
        if outcome.alerted {
            alerted.push(enemy.id);
        }
        *enemy = outcome.enemy;
    }

    for id in alerted {
        log::debug!("Enemy {} gave chase", id);
        state.emit(GameEvent::EnemyAlerted { id });
    }
}

fn apply_motion(state: &mut GameState, motion: Motion) {
    let p = &state.player;
    let feet = Vec2::new(p.pos.x + p.size.x / 2.0, p.pos.y + p.size.y);
    let claws = Vec2::new(
        p.pos.x + if p.facing_right { 30.0 } else { 0.0 },
        p.pos.y + 15.0,
    );
    let (pos, size) = (p.pos, p.size);

    if motion.scratched {
        state.spawn_particles(claws, ParticleKind::Scratch, 5);
        state.emit(GameEvent::Scratched);
    }
    if motion.landed {
        state.spawn_particles(feet, ParticleKind::Dust, 6);
        state.emit(GameEvent::Landed);
    }
    if motion.jumped {
        match motion.wall_jumped {
            Some(dir) => {
                let x = pos.x + if dir == 1 { size.x } else { 0.0 };
                state.spawn_particles(Vec2::new(x, pos.y + size.y / 2.0), ParticleKind::Dust, 4);
                state.emit(GameEvent::WallJumped);
            }
            None => {
                state.spawn_particles(feet, ParticleKind::Dust, 4);
                state.emit(GameEvent::Jumped);
            }
        }
    }
    if motion.fell_out {
        state.kill_player();
    }
}
