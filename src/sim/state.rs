//! Game state and core simulation types
//!
//! Everything the presentation layer reads each frame lives here. The
//! presentation layer must treat it as read-only and drain `events`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::level::{Level, LevelTemplate};
use super::particles::{self, Particle, ParticleKind};
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Top-level session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for a menu action
    Menu,
    /// Active gameplay
    Playing,
    /// Exit reached, waiting to advance
    LevelComplete,
    /// Out of lives
    GameOver,
    /// Every level cleared
    Victory,
}

/// The player's character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    /// Grounded state at the end of the previous tick's collision pass
    pub was_grounded: bool,
    pub wall_sliding: bool,
    /// Side of the wall being slid on: -1 left, 1 right, 0 none
    pub wall_dir: i8,
    pub facing_right: bool,
    pub attacking: bool,
    pub attack_timer: u32,
    pub invulnerable_timer: u32,
    pub dead: bool,
    /// Run animation counter
    pub frame: u32,
}

impl Player {
    pub fn new(start: Vec2) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            grounded: false,
            was_grounded: false,
            wall_sliding: false,
            wall_dir: 0,
            facing_right: true,
            attacking: false,
            attack_timer: 0,
            invulnerable_timer: 0,
            dead: false,
            frame: 0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Forward scratch hitbox: full height, extending from the leading edge
    pub fn attack_box(&self, width: f32) -> Rect {
        let x = if self.facing_right {
            self.pos.x + self.size.x
        } else {
            self.pos.x - width
        };
        Rect::new(x, self.pos.y, width, self.size.y)
    }

    /// Put the player back at the spawn point after a death
    pub fn respawn(&mut self, start: Vec2, invulnerable_ticks: u32) {
        self.pos = start;
        self.vel = Vec2::ZERO;
        self.dead = false;
        self.invulnerable_timer = invulnerable_ticks;
        self.attacking = false;
        self.attack_timer = 0;
    }
}

/// The closed set of enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Ground patroller
    PatrolDrone,
    /// Sleeps until the player wanders close, then chases
    GuardDog,
    /// Hides until the player is close, then pops up
    AmbushVegetable,
    /// Air patroller
    FlyingPatroller,
    /// Patroller with a vertical bob
    FloatingGhost,
}

/// Authored spawn parameters for an enemy type, relative to its tile
#[derive(Debug, Clone, Copy)]
pub struct SpawnProfile {
    pub offset: Vec2,
    pub size: Vec2,
    /// Half-width of the patrol range around the spawn x
    pub patrol_reach: f32,
    pub speed: f32,
    pub detection_range: f32,
}

impl EnemyKind {
    pub fn initial_state(self) -> AiState {
        match self {
            EnemyKind::GuardDog => AiState::Sleep,
            EnemyKind::AmbushVegetable => AiState::Hidden,
            _ => AiState::Patrol,
        }
    }

    pub fn profile(self) -> SpawnProfile {
        match self {
            EnemyKind::PatrolDrone => SpawnProfile {
                offset: Vec2::new(0.0, 10.0),
                size: Vec2::new(40.0, 30.0),
                patrol_reach: 100.0,
                speed: 2.0,
                detection_range: 0.0,
            },
            EnemyKind::AmbushVegetable => SpawnProfile {
                offset: Vec2::new(5.0, 5.0),
                size: Vec2::new(30.0, 35.0),
                patrol_reach: 60.0,
                speed: 1.0,
                detection_range: 120.0,
            },
            EnemyKind::GuardDog => SpawnProfile {
                offset: Vec2::new(0.0, 8.0),
                size: Vec2::new(48.0, 32.0),
                patrol_reach: 150.0,
                speed: 3.5,
                detection_range: 160.0,
            },
            EnemyKind::FlyingPatroller => SpawnProfile {
                offset: Vec2::ZERO,
                size: Vec2::new(40.0, 30.0),
                patrol_reach: 200.0,
                speed: 2.5,
                detection_range: 0.0,
            },
            EnemyKind::FloatingGhost => SpawnProfile {
                offset: Vec2::new(0.0, -20.0),
                size: Vec2::new(32.0, 40.0),
                patrol_reach: 150.0,
                speed: 1.5,
                detection_range: 0.0,
            },
        }
    }
}

/// AI state; which variants are reachable depends on [`EnemyKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Patrol,
    Sleep,
    /// Wind-up before a chase
    Alert {
        ticks_left: u32,
    },
    Chase,
    Hidden,
    /// Rising out of hiding
    Surprise,
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub rect: Rect,
    pub patrol_start: f32,
    pub patrol_end: f32,
    /// -1.0 or 1.0
    pub direction: f32,
    pub speed: f32,
    #[serde(default)]
    pub is_dead: bool,
    pub state: AiState,
    /// 0 disables distance checks
    pub detection_range: f32,
    /// Spawn y; never changes
    pub original_y: f32,
}

impl Enemy {
    /// Spawn an enemy of `kind` on the tile whose top-left corner is `(tile_x, tile_y)`
    pub fn spawn(id: u32, kind: EnemyKind, tile_x: f32, tile_y: f32) -> Self {
        let p = kind.profile();
        let x = tile_x + p.offset.x;
        let y = tile_y + p.offset.y;
        Self {
            id,
            kind,
            rect: Rect::new(x, y, p.size.x, p.size.y),
            patrol_start: x - p.patrol_reach,
            patrol_end: x + p.patrol_reach,
            direction: 1.0,
            speed: p.speed,
            is_dead: false,
            state: kind.initial_state(),
            detection_range: p.detection_range,
            original_y: y,
        }
    }
}

/// A collectible ball of yarn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yarn {
    pub rect: Rect,
    #[serde(default)]
    pub collected: bool,
}

impl Yarn {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            collected: false,
        }
    }
}

/// How an enemy was defeated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatCause {
    Scratch,
    Stomp,
}

/// Things that happened during a tick, for audio, HUD and save collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { index: usize },
    Jumped,
    WallJumped,
    Landed,
    Scratched,
    YarnCollected { count: usize },
    DoorOpened,
    NoticeHidden,
    EnemyAlerted { id: u32 },
    EnemyDefeated { id: u32, cause: DefeatCause },
    PlayerDied { lives_left: u8 },
    Respawned,
    LevelCompleted { index: usize },
    /// A strictly higher level was unlocked and should be persisted
    ProgressUnlocked { level: usize },
    GameOver,
    Victory,
}

/// A delayed transition owned by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    Respawn,
    AdvanceLevel { next: usize },
    HideNotice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled {
    pub action: ScheduledAction,
    pub ticks_left: u32,
    /// Level epoch at scheduling time; stale entries are dropped
    pub epoch: u64,
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed for particle spread
    pub seed: u64,
    #[serde(skip, default = "fresh_rng")]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Authored levels, never mutated
    levels: Vec<LevelTemplate>,
    pub status: GameStatus,
    /// Current attempt, if a level is loaded
    pub level: Option<Level>,
    pub player: Player,
    pub lives: u8,
    pub score: u64,
    pub yarns_collected: usize,
    pub exit_unlocked: bool,
    pub show_door_notice: bool,
    /// Highest level index the player may continue from
    pub unlocked_level: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Bumped on every level load or session reset
    pub epoch: u64,
    pub schedule: Vec<Scheduled>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub particle_cap: usize,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(levels: Vec<LevelTemplate>, tuning: Tuning, seed: u64) -> Self {
        let lives = tuning.max_lives;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            levels,
            status: GameStatus::Menu,
            level: None,
            player: Player::new(Vec2::ZERO),
            lives,
            score: 0,
            yarns_collected: 0,
            exit_unlocked: false,
            show_door_notice: false,
            unlocked_level: 0,
            time_ticks: 0,
            epoch: 0,
            schedule: Vec::new(),
            particles: Vec::new(),
            particle_cap: Settings::default().max_particles(),
            events: Vec::new(),
        }
    }

    pub fn levels(&self) -> &[LevelTemplate] {
        &self.levels
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level_index(&self) -> Option<usize> {
        self.level.as_ref().map(|l| l.index)
    }

    /// Seed the continue point from persisted progress
    pub fn set_unlocked_level(&mut self, level: usize) {
        self.unlocked_level = level.min(self.levels.len().saturating_sub(1));
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.particle_cap = settings.max_particles();
        self.particles.truncate(self.particle_cap);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Session actions ===

    /// Fresh run from the first level
    pub fn start_new_game(&mut self) {
        self.begin_session(0);
    }

    /// Fresh run from the highest unlocked level
    pub fn continue_game(&mut self) {
        self.begin_session(self.unlocked_level);
    }

    /// Restart the current level with full lives and zero score
    pub fn retry_level(&mut self) {
        let index = self.level_index().unwrap_or(0);
        self.begin_session(index);
    }

    /// Leave the current run for the menu. Pending transitions are cancelled.
    pub fn return_to_menu(&mut self) {
        log::info!("Returning to menu");
        self.epoch += 1;
        self.cancel_schedule();
        self.particles.clear();
        self.level = None;
        self.exit_unlocked = false;
        self.yarns_collected = 0;
        self.status = GameStatus::Menu;
    }

    /// Drop every pending transition along with the state they would undo
    fn cancel_schedule(&mut self) {
        self.schedule.clear();
        self.show_door_notice = false;
    }

    fn begin_session(&mut self, index: usize) {
        log::info!("Starting session at level {}", index);
        self.lives = self.tuning.max_lives;
        self.score = 0;
        if self.load_level(index) {
            self.status = GameStatus::Playing;
        }
    }

    /// Instantiate level `index` from its template. An index past the end is
    /// the victory state. Cancels every pending scheduled transition.
    pub fn load_level(&mut self, index: usize) -> bool {
        self.epoch += 1;
        self.cancel_schedule();
        self.particles.clear();
        self.yarns_collected = 0;

        let Some(template) = self.levels.get(index) else {
            log::info!("No level {}, run complete", index);
            self.level = None;
            self.status = GameStatus::Victory;
            self.emit(GameEvent::Victory);
            return false;
        };

        let level = template.instantiate(index);
        log::info!(
            "Loaded level {} '{}' ({} platforms, {} enemies, {} yarn)",
            index,
            level.name,
            level.platforms.len(),
            level.enemies.len(),
            level.yarns.len()
        );

        let facing_right = self.player.facing_right;
        self.player = Player::new(level.player_start);
        self.player.facing_right = facing_right;
        self.exit_unlocked =
            level.required_yarns(self.tuning.yarns_to_unlock) == 0 && level.all_collected();
        self.level = Some(level);
        self.emit(GameEvent::LevelStarted { index });
        true
    }

    /// Queue a delayed transition against the current epoch
    pub fn schedule(&mut self, action: ScheduledAction, delay_ticks: u32) {
        self.schedule.push(Scheduled {
            action,
            ticks_left: delay_ticks,
            epoch: self.epoch,
        });
    }

    pub fn is_scheduled(&self, action: ScheduledAction) -> bool {
        self.schedule.iter().any(|s| s.action == action)
    }

    // === Death / respawn ===

    /// Kill the player. Latched: repeat calls before respawn do nothing.
    pub fn kill_player(&mut self) {
        if self.player.dead {
            return;
        }
        self.player.dead = true;
        let center = self.player.rect().center();
        self.spawn_particles(center, ParticleKind::Hit, 20);

        self.lives = self.lives.saturating_sub(1);
        log::debug!("Player died, {} lives left", self.lives);
        self.emit(GameEvent::PlayerDied {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            log::info!("Game over with score {}", self.score);
            self.status = GameStatus::GameOver;
            self.cancel_schedule();
            self.emit(GameEvent::GameOver);
        } else {
            self.schedule(ScheduledAction::Respawn, self.tuning.respawn_delay_ticks);
        }
    }

    /// Return the player to the start and reset every enemy to its spawn values.
    /// Collected yarn stays collected.
    pub fn respawn(&mut self) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let Some(template) = self.levels.get(level.index) else {
            return;
        };
        level.enemies.clone_from(&template.enemies);
        self.player
            .respawn(level.player_start, self.tuning.invulnerability_ticks);
        log::debug!("Player respawned at {:?}", level.player_start);
        self.emit(GameEvent::Respawned);
    }

    // === Particles ===

    pub fn spawn_particles(&mut self, at: Vec2, kind: ParticleKind, count: usize) {
        let theme = self.level.as_ref().map(|l| l.theme).unwrap_or_default();
        let room = self.particle_cap.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let p = particles::make(&mut self.rng, theme, at, kind);
            self.particles.push(p);
        }
    }
}
