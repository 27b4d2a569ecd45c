//! Interaction resolution: pickups, enemy contact, exit and timers
//!
//! Runs after AI and physics each tick.

use glam::Vec2;

use super::particles::ParticleKind;
use super::state::{DefeatCause, GameEvent, GameState, GameStatus, Player, ScheduledAction};

/// Pick up every uncollected yarn the player overlaps. A yarn is marked
/// collected the moment it is counted, so a lingering overlap never counts twice.
pub fn collect_yarn(state: &mut GameState) {
    if state.player.dead {
        return;
    }
    let body = state.player.rect();
    let Some(level) = state.level.as_mut() else {
        return;
    };

    let mut picked: Vec<Vec2> = Vec::new();
    for yarn in level.yarns.iter_mut().filter(|y| !y.collected) {
        if yarn.rect.intersects(&body) {
            yarn.collected = true;
            picked.push(yarn.rect.center());
        }
    }
    let required = level.required_yarns(state.tuning.yarns_to_unlock);

    for at in picked {
        state.yarns_collected += 1;
        state.score += state.tuning.yarn_score;
        state.spawn_particles(at, ParticleKind::Sparkle, 15);
        state.emit(GameEvent::YarnCollected {
            count: state.yarns_collected,
        });

        if !state.exit_unlocked && state.yarns_collected >= required {
            unlock_exit(state);
        }
    }
}

fn unlock_exit(state: &mut GameState) {
    log::info!("Exit unlocked");
    state.exit_unlocked = true;
    state.show_door_notice = true;
    state.emit(GameEvent::DoorOpened);
    state.schedule(ScheduledAction::HideNotice, state.tuning.notice_ticks);
}

/// Resolve player contact with every live enemy: scratch, then stomp,
/// otherwise the player gets hurt. One outcome per enemy per tick.
pub fn resolve_enemy_contact(state: &mut GameState) {
    if state.player.dead {
        return;
    }
    let attack_width = state.tuning.attack_width;
    let stomp_tolerance = state.tuning.stomp_tolerance;
    let bounce = state.tuning.jump_force * state.tuning.stomp_bounce;

    let Some(level) = state.level.as_mut() else {
        return;
    };
    let player = &mut state.player;

    let mut defeated: Vec<(u32, Vec2, DefeatCause)> = Vec::new();
    let mut hurt = false;

    for enemy in level.enemies.iter_mut().filter(|e| !e.is_dead) {
        if !player.rect().intersects(&enemy.rect) {
            continue;
        }

        let cause = if player.attacking {
            player
                .attack_box(attack_width)
                .intersects(&enemy.rect)
                .then_some(DefeatCause::Scratch)
        } else if player.vel.y > 0.0
            && player.bottom() < enemy.rect.y + enemy.rect.h / 2.0 + stomp_tolerance
        {
            player.vel.y = bounce;
            Some(DefeatCause::Stomp)
        } else {
            None
        };

        match cause {
            Some(cause) => {
                enemy.is_dead = true;
                defeated.push((enemy.id, enemy.rect.center(), cause));
            }
            None if player.invulnerable_timer == 0 => hurt = true,
            None => {}
        }
    }

    for (id, at, cause) in defeated {
        log::debug!("Enemy {} defeated by {:?}", id, cause);
        state.score += state.tuning.enemy_score;
        state.spawn_particles(at, ParticleKind::Hit, 15);
        if cause == DefeatCause::Stomp {
            state.emit(GameEvent::Jumped);
        }
        state.emit(GameEvent::EnemyDefeated { id, cause });
    }

    if hurt {
        state.kill_player();
    }
}

/// Finish the level when the player reaches an open exit. The door only
/// counts once every yarn in the level has been collected.
pub fn check_exit(state: &mut GameState) {
    if state.status != GameStatus::Playing || state.player.dead || !state.exit_unlocked {
        return;
    }
    let Some(level) = state.level.as_ref() else {
        return;
    };
    if level.all_collected() && state.player.rect().intersects(&level.door) {
        complete_level(state);
    }
}

/// Award the bonus, record progress and schedule the advance. The status
/// change to `LevelComplete` latches this against repeat triggers.
fn complete_level(state: &mut GameState) {
    let Some(index) = state.level_index() else {
        return;
    };
    log::info!("Level {} complete, score {}", index, state.score);

    state.status = GameStatus::LevelComplete;
    state.score += state.tuning.level_bonus;
    state.spawn_particles(state.player.pos, ParticleKind::Sparkle, 30);
    state.emit(GameEvent::LevelCompleted { index });

    let next = index + 1;
    if next > state.unlocked_level && next < state.level_count() {
        state.unlocked_level = next;
        state.emit(GameEvent::ProgressUnlocked { level: next });
    }

    state.schedule(
        ScheduledAction::AdvanceLevel { next },
        state.tuning.advance_delay_ticks,
    );
}

/// Count down the attack and invulnerability timers
pub fn tick_timers(player: &mut Player) {
    player.attack_timer = player.attack_timer.saturating_sub(1);
    player.attacking = player.attack_timer > 0;
    player.invulnerable_timer = player.invulnerable_timer.saturating_sub(1);
}
