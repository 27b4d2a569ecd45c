//! Visual feedback particles
//!
//! Purely observational: nothing in the simulation reads particles back.
//! Spread comes from the state's seeded RNG so replays match.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::Theme;
use crate::tuning::Tuning;

/// Particle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Landing / jumping puffs
    Dust,
    /// Damage debris
    Hit,
    /// Pickup and win stars
    Sparkle,
    /// Scratch streaks
    Scratch,
    Generic,
}

impl ParticleKind {
    /// Debris kinds fall under gravity
    pub fn has_gravity(self) -> bool {
        matches!(self, ParticleKind::Hit | ParticleKind::Dust)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: f32,
    pub max_life: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
    /// Degrees
    pub rotation: f32,
    pub rot_speed: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Remaining life as 0-1, for fading
    pub fn alpha(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn dust_color(theme: Theme) -> u32 {
    match theme {
        Theme::Garden => 0x86efac,
        Theme::Roof => 0xe0f2fe,
        _ => 0xe5e7eb,
    }
}

/// Symmetric random value in [-half, half)
#[inline]
fn spread(rng: &mut Pcg32, half: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * half * 2.0
}

/// Create one particle of `kind` at `at`
pub fn make(rng: &mut Pcg32, theme: Theme, at: Vec2, kind: ParticleKind) -> Particle {
    let rotation = rng.random::<f32>() * 360.0;
    let rot_speed = spread(rng, 5.0);

    let (vel, life, size, color) = match kind {
        ParticleKind::Dust => (
            Vec2::new(spread(rng, 1.0), -rng.random::<f32>() * 2.0),
            20.0 + rng.random::<f32>() * 10.0,
            6.0 + rng.random::<f32>() * 6.0,
            dust_color(theme),
        ),
        ParticleKind::Hit => (
            Vec2::new(spread(rng, 5.0), spread(rng, 5.0)),
            30.0 + rng.random::<f32>() * 20.0,
            5.0 + rng.random::<f32>() * 5.0,
            0xef4444,
        ),
        ParticleKind::Sparkle => (
            Vec2::new(spread(rng, 3.0), -rng.random::<f32>() * 4.0),
            40.0 + rng.random::<f32>() * 20.0,
            4.0 + rng.random::<f32>() * 4.0,
            0xfbbf24,
        ),
        ParticleKind::Scratch => (
            Vec2::new(spread(rng, 7.5), spread(rng, 7.5)),
            10.0,
            2.0,
            0xffffff,
        ),
        ParticleKind::Generic => (
            Vec2::new(spread(rng, 3.0), spread(rng, 3.0)),
            30.0 + rng.random::<f32>() * 20.0,
            4.0 + rng.random::<f32>() * 4.0,
            0xffffff,
        ),
    };

    Particle {
        pos: at,
        vel,
        life,
        max_life: life,
        color,
        size,
        rotation,
        rot_speed,
        kind,
    }
}

/// Advance all particles one tick and drop the expired ones
pub fn integrate(particles: &mut Vec<Particle>, wind: f32, tuning: &Tuning) {
    let drift = wind * tuning.particle_wind_factor;
    for p in particles.iter_mut() {
        p.pos.x += p.vel.x + drift;
        p.pos.y += p.vel.y;
        p.life -= 1.0;
        p.rotation += p.rot_speed;
        if p.kind.has_gravity() {
            p.vel.y += tuning.particle_gravity;
        }
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_same_seed_same_particles() {
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for kind in [ParticleKind::Dust, ParticleKind::Hit, ParticleKind::Sparkle] {
            let pa = make(&mut a, Theme::Roof, Vec2::ZERO, kind);
            let pb = make(&mut b, Theme::Roof, Vec2::ZERO, kind);
            assert_eq!(pa.vel, pb.vel);
            assert_eq!(pa.life, pb.life);
        }
    }

    #[test]
    fn test_dust_floats_up_and_uses_theme_color() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let p = make(&mut rng, Theme::Garden, Vec2::ZERO, ParticleKind::Dust);
            assert!(p.vel.y <= 0.0);
            assert_eq!(p.color, 0x86efac);
        }
    }

    #[test]
    fn test_integrate_expires_and_drifts() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = Tuning::default();
        let mut particles = vec![make(&mut rng, Theme::Kitchen, Vec2::ZERO, ParticleKind::Scratch)];
        let start_x = particles[0].pos.x;
        let vx = particles[0].vel.x;

        integrate(&mut particles, -0.2, &tuning);
        assert_eq!(particles.len(), 1);
        assert!((particles[0].pos.x - (start_x + vx - 0.1)).abs() < 1e-5);
        assert_eq!(particles[0].life, 9.0);

        for _ in 0..9 {
            integrate(&mut particles, 0.0, &tuning);
        }
        assert!(particles.is_empty());
    }

    #[test]
    fn test_debris_falls() {
        let mut rng = Pcg32::seed_from_u64(9);
        let tuning = Tuning::default();
        let mut particles = vec![make(&mut rng, Theme::Kitchen, Vec2::ZERO, ParticleKind::Hit)];
        let vy = particles[0].vel.y;
        integrate(&mut particles, 0.0, &tuning);
        assert!((particles[0].vel.y - (vy + 0.2)).abs() < 1e-5);
    }
}
