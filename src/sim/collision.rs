//! Player physics and platform collision
//!
//! Collision is swept along each axis without storing the previous
//! position: last tick's edges are recovered as `edge - velocity`. That is
//! what lets one-way platforms catch a falling player while letting a rising
//! or sideways-moving player straight through.

use super::level::{Level, Platform};
use super::state::Player;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Contact summary of one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub grounded: bool,
    pub hit_ceiling: bool,
    /// -1 wall on the left, 1 wall on the right, 0 none
    pub wall_dir: i8,
}

/// What the player did this tick, for events and particles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Motion {
    pub scratched: bool,
    pub landed: bool,
    pub jumped: bool,
    /// Wall side pushed off from, when the jump was a wall jump
    pub wall_jumped: Option<i8>,
    pub fell_out: bool,
}

/// Apply input, gravity and collisions to the player for one tick
pub fn step_player(player: &mut Player, level: &Level, input: &TickInput, tuning: &Tuning) -> Motion {
    let mut motion = Motion::default();
    let physics = level.physics;

    if !player.dead {
        // Right wins when both directions are held
        let moved = if input.right {
            player.vel.x += tuning.accel;
            player.facing_right = true;
            true
        } else if input.left {
            player.vel.x -= tuning.accel;
            player.facing_right = false;
            true
        } else {
            player.vel.x *= physics.friction;
            false
        };
        if moved {
            player.frame = player.frame.wrapping_add(1);
        }
        player.vel.x += physics.wind;
        player.vel.x = player.vel.x.clamp(-tuning.move_speed, tuning.move_speed);

        if input.attack && player.attack_timer == 0 {
            player.attacking = true;
            player.attack_timer = tuning.scratch_duration;
            motion.scratched = true;
        }
    }

    player.vel.y += tuning.gravity;
    player.pos += player.vel;

    resolve_platforms(player, &level.platforms);

    motion.landed = !player.was_grounded && player.grounded;
    player.was_grounded = player.grounded;

    if input.jump && !player.dead {
        if player.grounded {
            player.vel.y = tuning.jump_force;
            player.grounded = false;
            motion.jumped = true;
        } else if player.wall_sliding {
            player.vel.y = tuning.wall_jump_force.y;
            player.vel.x = -(player.wall_dir as f32) * tuning.wall_jump_force.x;
            player.wall_sliding = false;
            motion.jumped = true;
            motion.wall_jumped = Some(player.wall_dir);
        }
    }

    if player.wall_sliding && player.vel.y > 0.0 {
        player.vel.y = player.vel.y.min(tuning.wall_slide_speed);
    }

    player.pos.x = player.pos.x.clamp(0.0, (level.width - player.size.x).max(0.0));
    motion.fell_out = player.pos.y > level.height + tuning.fall_margin;

    motion
}

/// Resolve the player against every platform, resetting and then setting
/// the grounded and wall-slide flags.
pub fn resolve_platforms(player: &mut Player, platforms: &[Platform]) -> CollisionFlags {
    let mut flags = CollisionFlags::default();
    player.grounded = false;
    player.wall_sliding = false;
    player.wall_dir = 0;

    for plat in platforms {
        let r = &plat.rect;
        let one_way = plat.is_one_way();
        let (w, h) = (player.size.x, player.size.y);

        // Vertical contacts need horizontal overlap
        if player.pos.x + w > r.x && player.pos.x < r.right() {
            let bottom = player.pos.y + h;
            let old_bottom = bottom - player.vel.y;
            if player.vel.y >= 0.0 && bottom >= r.y && old_bottom <= r.y {
                player.pos.y = r.y - h;
                player.vel.y = 0.0;
                player.grounded = true;
                flags.grounded = true;
            } else if !one_way
                && player.vel.y < 0.0
                && player.pos.y <= r.bottom()
                && player.pos.y - player.vel.y >= r.bottom()
            {
                player.pos.y = r.bottom();
                player.vel.y = 0.0;
                flags.hit_ceiling = true;
            }
        }

        // Walls need vertical overlap; one-way platforms never block sideways
        if !one_way && player.pos.y + h > r.y && player.pos.y < r.bottom() {
            let right_edge = player.pos.x + w;
            if player.vel.x > 0.0 && right_edge >= r.x && right_edge - player.vel.x <= r.x {
                player.pos.x = r.x - w;
                player.vel.x = 0.0;
                if !player.grounded {
                    player.wall_sliding = true;
                    player.wall_dir = 1;
                    flags.wall_dir = 1;
                }
            } else if player.vel.x < 0.0
                && player.pos.x <= r.right()
                && player.pos.x - player.vel.x >= r.right()
            {
                player.pos.x = r.right();
                player.vel.x = 0.0;
                if !player.grounded {
                    player.wall_sliding = true;
                    player.wall_dir = -1;
                    flags.wall_dir = -1;
                }
            }
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use crate::sim::level::{LevelPhysics, LevelTemplate, Theme};
    use glam::Vec2;
    use proptest::prelude::*;

    fn level_with(platforms: Vec<Platform>, physics: LevelPhysics) -> Level {
        LevelTemplate {
            id: 1,
            name: "test".into(),
            description: String::new(),
            theme: Theme::Kitchen,
            physics,
            player_start: Vec2::ZERO,
            platforms,
            enemies: Vec::new(),
            yarns: Vec::new(),
            door: Rect::default(),
            width: 800.0,
            height: 600.0,
        }
        .instantiate(0)
    }

    fn player(x: f32, y: f32, vx: f32, vy: f32) -> Player {
        let mut p = Player::new(Vec2::new(x, y));
        p.vel = Vec2::new(vx, vy);
        p
    }

    #[test]
    fn test_landing_snaps_onto_platform() {
        // Previous bottom (y + h - vy) = 98 <= 100, current bottom 103 >= 100
        let plat = Platform::solid(Rect::new(0.0, 100.0, 200.0, 40.0));
        let mut p = player(50.0, 71.0, 0.0, 5.0);
        let flags = resolve_platforms(&mut p, &[plat]);
        assert!(flags.grounded);
        assert!(p.grounded);
        assert_eq!(p.pos.y, 100.0 - 32.0);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn test_one_way_catches_from_above() {
        let plat = Platform::one_way(Rect::new(0.0, 100.0, 200.0, 40.0));
        let mut p = player(50.0, 71.0, 0.0, 5.0);
        resolve_platforms(&mut p, &[plat]);
        assert!(p.grounded);
        assert_eq!(p.pos.y, 68.0);
    }

    #[test]
    fn test_one_way_passes_rising_player() {
        let plat = Platform::one_way(Rect::new(0.0, 100.0, 200.0, 40.0));
        let mut p = player(50.0, 120.0, 0.0, -8.0);
        resolve_platforms(&mut p, &[plat]);
        assert!(!p.grounded);
        assert_eq!(p.pos.y, 120.0);
        assert_eq!(p.vel.y, -8.0);
    }

    #[test]
    fn test_solid_ceiling_stops_rising_player() {
        let plat = Platform::solid(Rect::new(0.0, 100.0, 200.0, 40.0));
        // Previous top 145 >= 140, current top 137 <= 140
        let mut p = player(50.0, 137.0, 0.0, -8.0);
        let flags = resolve_platforms(&mut p, &[plat]);
        assert!(flags.hit_ceiling);
        assert_eq!(p.pos.y, 140.0);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn test_wall_blocks_and_starts_slide() {
        let wall = Platform::solid(Rect::new(100.0, 0.0, 40.0, 400.0));
        // Right edge 102 now, 96 last tick
        let mut p = player(70.0, 200.0, 6.0, 1.0);
        let flags = resolve_platforms(&mut p, &[wall]);
        assert_eq!(flags.wall_dir, 1);
        assert!(p.wall_sliding);
        assert_eq!(p.pos.x, 68.0);
        assert_eq!(p.vel.x, 0.0);
    }

    #[test]
    fn test_left_wall_sets_negative_dir() {
        let wall = Platform::solid(Rect::new(0.0, 0.0, 40.0, 400.0));
        let mut p = player(38.0, 200.0, -6.0, 1.0);
        resolve_platforms(&mut p, &[wall]);
        assert_eq!(p.wall_dir, -1);
        assert_eq!(p.pos.x, 40.0);
    }

    #[test]
    fn test_one_way_never_blocks_sideways() {
        let plat = Platform::one_way(Rect::new(100.0, 0.0, 40.0, 400.0));
        let mut p = player(70.0, 200.0, 6.0, 1.0);
        resolve_platforms(&mut p, &[plat]);
        assert_eq!(p.pos.x, 70.0);
        assert_eq!(p.vel.x, 6.0);
        assert!(!p.wall_sliding);
    }

    #[test]
    fn test_wall_jump_kicks_away() {
        let tuning = Tuning::default();
        let wall = Platform::solid(Rect::new(100.0, 0.0, 40.0, 600.0));
        let level = level_with(vec![wall], LevelPhysics::default());
        // Touching the wall: holding right pushes the edge 0.8 px into it
        let mut p = player(68.0, 200.0, 0.0, 1.0);
        let input = TickInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        let motion = step_player(&mut p, &level, &input, &tuning);
        assert!(motion.jumped);
        assert_eq!(motion.wall_jumped, Some(1));
        assert_eq!(p.vel.x, -10.0);
        assert_eq!(p.vel.y, -12.0);
        assert_eq!(p.pos.x, 68.0);
        assert!(!p.wall_sliding);
    }

    #[test]
    fn test_wall_slide_caps_fall() {
        let tuning = Tuning::default();
        let wall = Platform::solid(Rect::new(100.0, 0.0, 40.0, 600.0));
        let level = level_with(vec![wall], LevelPhysics::default());
        let mut p = player(68.0, 200.0, 0.0, 9.0);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        let motion = step_player(&mut p, &level, &input, &tuning);
        assert!(!motion.jumped);
        assert!(p.wall_sliding);
        assert_eq!(p.wall_dir, 1);
        assert_eq!(p.pos.x, 68.0);
        assert_eq!(p.vel.x, 0.0);
        assert_eq!(p.vel.y, 2.0);
    }

    #[test]
    fn test_ground_jump_and_landing() {
        let tuning = Tuning::default();
        let floor = Platform::solid(Rect::new(0.0, 500.0, 800.0, 40.0));
        let level = level_with(vec![floor], LevelPhysics::default());
        let mut p = player(100.0, 467.5, 0.0, 0.0);

        let idle = TickInput::default();
        let first = step_player(&mut p, &level, &idle, &tuning);
        assert!(first.landed);
        assert!(p.grounded);

        let second = step_player(&mut p, &level, &idle, &tuning);
        assert!(!second.landed);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let m = step_player(&mut p, &level, &jump, &tuning);
        assert!(m.jumped);
        assert_eq!(p.vel.y, -13.5);
        assert!(!p.grounded);
    }

    #[test]
    fn test_right_wins_over_left() {
        let tuning = Tuning::default();
        let level = level_with(Vec::new(), LevelPhysics::default());
        let mut p = player(100.0, 100.0, 0.0, 0.0);
        p.facing_right = false;
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        step_player(&mut p, &level, &both, &tuning);
        assert!(p.facing_right);
        assert!((p.vel.x - 0.8).abs() < 1e-6);
        assert_eq!(p.frame, 1);
    }

    #[test]
    fn test_attack_starts_timer_once() {
        let tuning = Tuning::default();
        let level = level_with(Vec::new(), LevelPhysics::default());
        let mut p = player(100.0, 100.0, 0.0, 0.0);
        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        assert!(step_player(&mut p, &level, &attack, &tuning).scratched);
        assert!(p.attacking);
        assert_eq!(p.attack_timer, 15);
        assert!(!step_player(&mut p, &level, &attack, &tuning).scratched);
    }

    #[test]
    fn test_fall_out_and_x_clamp() {
        let tuning = Tuning::default();
        let level = level_with(Vec::new(), LevelPhysics::default());
        let mut p = player(-20.0, 699.0, 0.0, 2.0);
        let m = step_player(&mut p, &level, &TickInput::default(), &tuning);
        assert_eq!(p.pos.x, 0.0);
        assert!(m.fell_out);

        let mut p = player(900.0, 0.0, 0.0, 0.0);
        step_player(&mut p, &level, &TickInput::default(), &tuning);
        assert_eq!(p.pos.x, 800.0 - 32.0);
    }

    proptest! {
        #[test]
        fn prop_velocity_clamped(
            vx in -50.0f32..50.0,
            friction in 0.0f32..1.0,
            wind in -3.0f32..3.0,
            left in any::<bool>(),
            right in any::<bool>(),
        ) {
            let tuning = Tuning::default();
            let level = level_with(Vec::new(), LevelPhysics { friction, wind });
            let mut p = player(400.0, 100.0, vx, 0.0);
            let input = TickInput { left, right, ..Default::default() };
            step_player(&mut p, &level, &input, &tuning);
            prop_assert!(p.vel.x.abs() <= tuning.move_speed);
        }

        #[test]
        fn prop_one_way_law(
            x in 0.0f32..300.0,
            y in 0.0f32..300.0,
            vx in -10.0f32..10.0,
            vy in -20.0f32..20.0,
        ) {
            let plat = Platform::one_way(Rect::new(100.0, 150.0, 120.0, 40.0));
            let mut p = player(x, y, vx, vy);
            let before = p.clone();
            resolve_platforms(&mut p, &[plat.clone()]);

            // Never blocks sideways or upward
            prop_assert_eq!(p.pos.x, before.pos.x);
            prop_assert_eq!(p.vel.x, before.vel.x);
            if vy < 0.0 {
                prop_assert_eq!(p.pos.y, before.pos.y);
                prop_assert_eq!(p.vel.y, before.vel.y);
            }

            // Stops a fall only when last tick's bottom was at or above the top
            if p.grounded {
                let old_bottom = before.bottom() - before.vel.y;
                prop_assert!(before.vel.y >= 0.0);
                prop_assert!(old_bottom <= plat.rect.y);
                prop_assert_eq!(p.bottom(), plat.rect.y);
            }
        }
    }
}
