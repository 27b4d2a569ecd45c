//! The four built-in levels

use super::parser::{LevelParseError, LevelSource, parse_level};
use crate::consts::{FRICTION_DEFAULT, FRICTION_ICE};
use crate::sim::level::{LevelPhysics, LevelTemplate, Theme};

const KITCHEN_MAP: &[&str] = &[
    "....................",
    "....................",
    "X.....O.............",
    "X....===............",
    "X.........===......X",
    "X..................X",
    "X....O.............X",
    "X...====...........X",
    "X...=..=......O....X",
    "X...=..=...........X",
    "XP.......R.........X",
    "XXXXX..............X",
    "X..................X",
    "X...C...........D..X",
    "SSSSSSSSSSSSSSSSSSSS",
];

const GARDEN_MAP: &[&str] = &[
    "....................",
    "..............O.....",
    "X.....B.....====...X",
    "X..................X",
    "X...====...........X",
    "X.......XXXXX......X",
    "X...O..............X",
    "X.XXXXX.........O..X",
    "X..................X",
    "X.......XXXXXX.....X",
    "X...P..............X",
    "X.................DX",
    "X................XXX",
    "X......G.......G...X",
    "XXXXXXXXXXXXXXXXXXXX",
];

const ROOF_MAP: &[&str] = &[
    "....................",
    "....................",
    "X...O.....B........X",
    "X..===.............X",
    "X...X..............X",
    "X...X.......====...X",
    "X.......O...X......X",
    "X...........X......X",
    "X.XXXX......X...O..X",
    "X....X......X..XXXXX",
    "X....X......X......X",
    "X....P......X..D...X",
    "X......B...........X",
    "XXXXXXXXXXXXXXXXXXXX",
];

// Climbing level: one-way platforms let the player go up without snagging
const CASTLE_MAP: &[&str] = &[
    "...................D",
    "...............=====",
    "......O........X....",
    "....=====H.....X....",
    "...............X....",
    "...........O...=....",
    "....H......=...=....",
    "...........=...XXXXX",
    "....====...=.......X",
    "...........=.......X",
    "....====...=.......X",
    "O..........=.......X",
    "XX.........=.......X",
    "X...P..............X",
    "XXXXXXXXXXXXXXXXXXXX",
];

fn sources() -> [LevelSource<'static>; 4] {
    [
        LevelSource {
            id: 1,
            name: "Chaotic Kitchen",
            description: "Watch out for the robot vacuum!",
            theme: Theme::Kitchen,
            physics: LevelPhysics {
                friction: FRICTION_ICE,
                wind: 0.0,
            },
            rows: KITCHEN_MAP,
        },
        LevelSource {
            id: 2,
            name: "The Garden",
            description: "Don't wake the dogs.",
            theme: Theme::Garden,
            physics: LevelPhysics {
                friction: FRICTION_DEFAULT,
                wind: 0.0,
            },
            rows: GARDEN_MAP,
        },
        LevelSource {
            id: 3,
            name: "The Rooftop",
            description: "Very windy up here!",
            theme: Theme::Roof,
            physics: LevelPhysics {
                friction: FRICTION_DEFAULT,
                wind: -0.2,
            },
            rows: ROOF_MAP,
        },
        LevelSource {
            id: 4,
            name: "Haunted Castle",
            description: "Rescue your friend!",
            theme: Theme::Castle,
            physics: LevelPhysics {
                friction: FRICTION_DEFAULT,
                wind: 0.0,
            },
            rows: CASTLE_MAP,
        },
    ]
}

/// Parse every built-in level, stopping at the first bad map
pub fn try_builtin_levels() -> Result<Vec<LevelTemplate>, LevelParseError> {
    sources().iter().map(parse_level).collect()
}

/// The built-in level set. A map that fails to parse is logged and skipped.
pub fn builtin_levels() -> Vec<LevelTemplate> {
    sources()
        .iter()
        .filter_map(|source| match parse_level(source) {
            Ok(level) => Some(level),
            Err(e) => {
                log::error!("Built-in level '{}' is broken: {}", source.name, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{AiState, EnemyKind};

    #[test]
    fn test_all_builtin_levels_parse() {
        let levels = try_builtin_levels().unwrap();
        assert_eq!(levels.len(), 4);
        assert_eq!(levels, builtin_levels());
        for level in &levels {
            assert_eq!(level.width, 800.0);
            assert_eq!(level.yarns.len(), 3, "{}", level.name);
        }
    }

    #[test]
    fn test_level_physics() {
        let levels = builtin_levels();
        assert_eq!(levels[0].physics.friction, 0.96);
        assert_eq!(levels[2].physics.wind, -0.2);
        assert_eq!(levels[3].theme, Theme::Castle);
    }

    #[test]
    fn test_garden_dogs_start_asleep() {
        let garden = &builtin_levels()[1];
        let dogs: Vec<_> = garden
            .enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::GuardDog)
            .collect();
        assert_eq!(dogs.len(), 2);
        assert!(dogs.iter().all(|d| d.state == AiState::Sleep));
    }
}
