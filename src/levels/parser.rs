//! Text-grid level parser
//!
//! Each character is one 40 px tile:
//!
//! | Char | Meaning                          |
//! |------|----------------------------------|
//! | `.`  | Empty                            |
//! | `X`  | Solid block                      |
//! | `S`  | Slippery solid block             |
//! | `=`  | One-way platform                 |
//! | `P`  | Player start                     |
//! | `O`  | Yarn                             |
//! | `D`  | Exit door (occupies the tile above too) |
//! | `R`  | Patrol drone                     |
//! | `C`  | Ambush vegetable                 |
//! | `G`  | Guard dog                        |
//! | `B`  | Flying patroller                 |
//! | `H`  | Floating ghost                   |
//!
//! Runs of identical platform tiles on a row merge into one wide platform.

use glam::Vec2;
use thiserror::Error;

use crate::consts::{PLAYER_HEIGHT, TILE_SIZE};
use crate::sim::geometry::Rect;
use crate::sim::level::{LevelPhysics, LevelTemplate, Platform, PlatformKind, Texture, Theme};
use crate::sim::state::{Enemy, EnemyKind, Yarn};

/// Yarn hitbox edge length
const YARN_SIZE: f32 = 24.0;

/// Errors from parsing a level grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelParseError {
    #[error("level map has no rows")]
    Empty,

    #[error("row {row} is {len} tiles wide, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("unknown tile {tile:?} at row {row}, column {col}")]
    UnknownTile { tile: char, row: usize, col: usize },

    #[error("level has no player start")]
    MissingPlayerStart,

    #[error("level has no exit door")]
    MissingDoor,
}

/// Authored inputs for one level
#[derive(Debug, Clone, Copy)]
pub struct LevelSource<'a> {
    pub id: u32,
    pub name: &'a str,
    pub description: &'a str,
    pub theme: Theme,
    pub physics: LevelPhysics,
    pub rows: &'a [&'a str],
}

/// What a single tile contributes
enum Tile {
    Empty,
    Block { kind: PlatformKind, slippery: bool },
    PlayerStart,
    Yarn,
    Door,
    Enemy(EnemyKind),
}

impl Tile {
    fn from_char(c: char) -> Option<Self> {
        let tile = match c {
            '.' => Tile::Empty,
            'X' => Tile::Block {
                kind: PlatformKind::Solid,
                slippery: false,
            },
            'S' => Tile::Block {
                kind: PlatformKind::Solid,
                slippery: true,
            },
            '=' => Tile::Block {
                kind: PlatformKind::OneWay,
                slippery: false,
            },
            'P' => Tile::PlayerStart,
            'O' => Tile::Yarn,
            'D' => Tile::Door,
            'R' => Tile::Enemy(EnemyKind::PatrolDrone),
            'C' => Tile::Enemy(EnemyKind::AmbushVegetable),
            'G' => Tile::Enemy(EnemyKind::GuardDog),
            'B' => Tile::Enemy(EnemyKind::FlyingPatroller),
            'H' => Tile::Enemy(EnemyKind::FloatingGhost),
            _ => return None,
        };
        Some(tile)
    }
}

/// Parse a text grid into a level template, world bounds included
pub fn parse_level(source: &LevelSource) -> Result<LevelTemplate, LevelParseError> {
    let expected = source
        .rows
        .first()
        .map(|r| r.chars().count())
        .filter(|&n| n > 0)
        .ok_or(LevelParseError::Empty)?;

    let mut platforms = Vec::new();
    let mut enemies = Vec::new();
    let mut yarns = Vec::new();
    let mut player_start = None;
    let mut door = None;

    for (row, line) in source.rows.iter().enumerate() {
        let len = line.chars().count();
        if len != expected {
            return Err(LevelParseError::RaggedRow { row, len, expected });
        }

        let y = row as f32 * TILE_SIZE;
        let mut run: Option<Platform> = None;

        for (col, c) in line.chars().enumerate() {
            let x = col as f32 * TILE_SIZE;
            let tile = Tile::from_char(c).ok_or(LevelParseError::UnknownTile { tile: c, row, col })?;

            if let Tile::Block { kind, slippery } = tile {
                let texture = Texture::for_tile(source.theme, kind, slippery);
                match run.as_mut() {
                    Some(p)
                        if p.kind == kind
                            && p.slippery == slippery
                            && p.texture == Some(texture)
                            && p.rect.right() == x =>
                    {
                        p.rect.w += TILE_SIZE;
                    }
                    _ => {
                        platforms.extend(run.take());
                        run = Some(Platform {
                            rect: Rect::new(x, y, TILE_SIZE, TILE_SIZE),
                            kind,
                            slippery,
                            texture: Some(texture),
                        });
                    }
                }
                continue;
            }
            platforms.extend(run.take());

            match tile {
                Tile::PlayerStart => {
                    player_start = Some(Vec2::new(x + 4.0, y + (TILE_SIZE - PLAYER_HEIGHT) - 1.0));
                }
                Tile::Yarn => {
                    let inset = (TILE_SIZE - YARN_SIZE) / 2.0;
                    yarns.push(Yarn::new(Rect::new(x + inset, y + inset, YARN_SIZE, YARN_SIZE)));
                }
                Tile::Door => {
                    door = Some(Rect::new(x + 4.0, y - TILE_SIZE, 32.0, TILE_SIZE * 2.0));
                }
                Tile::Enemy(kind) => {
                    let id = enemies.len() as u32;
                    enemies.push(Enemy::spawn(id, kind, x, y));
                }
                Tile::Empty | Tile::Block { .. } => {}
            }
        }
        platforms.extend(run);
    }

    let player_start = player_start.ok_or(LevelParseError::MissingPlayerStart)?;
    let door = door.ok_or(LevelParseError::MissingDoor)?;

    log::trace!(
        "Parsed level {} '{}': {} platforms, {} enemies, {} yarn",
        source.id,
        source.name,
        platforms.len(),
        enemies.len(),
        yarns.len()
    );

    Ok(LevelTemplate {
        id: source.id,
        name: source.name.to_owned(),
        description: source.description.to_owned(),
        theme: source.theme,
        physics: source.physics,
        player_start,
        platforms,
        enemies,
        yarns,
        door,
        width: expected as f32 * TILE_SIZE,
        height: source.rows.len() as f32 * TILE_SIZE,
    }
    .with_world_bounds())
}
