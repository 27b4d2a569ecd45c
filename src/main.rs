//! Yarn Dash - headless native runner
//!
//! Plays the built-in levels with a scripted input pattern and logs the
//! event stream. Presentation hosts (web canvas, native window) drive the
//! same library API.
//!
//! Usage: `yarn-dash [ticks] [seed] [level]`. Without a level the run
//! continues from saved progress. Set `YARN_DASH_TUNING` to a JSON file to
//! override gameplay constants, `YARN_DASH_QUALITY` (low, medium, high) to
//! pick the particle budget and `RUST_LOG` to control verbosity.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts link the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use yarn_dash::consts::SIM_DT;
    use yarn_dash::levels::builtin_levels;
    use yarn_dash::sim::{FixedStep, GameEvent, GameState, GameStatus, TickInput};
    use yarn_dash::{Progress, QualityPreset, Settings, Tuning};

    const DEFAULT_TICKS: u64 = 60 * 60;

    fn progress_path() -> PathBuf {
        std::env::temp_dir().join(Progress::STORAGE_KEY)
    }

    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("YARN_DASH_TUNING") else {
            return Tuning::default();
        };
        let loaded = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("Bad tuning file {}: {}, using defaults", path, e);
                Tuning::default()
            }
        }
    }

    /// Run right, hop every 40 ticks and scratch every 25
    fn scripted_input(tick: u64) -> TickInput {
        TickInput {
            left: false,
            right: true,
            jump: tick % 40 < 6,
            attack: tick % 25 == 0,
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Yarn Dash (headless) starting...");

        let mut args = std::env::args().skip(1);
        let ticks = args
            .next()
            .and_then(|a| a.parse().ok())
            .unwrap_or(DEFAULT_TICKS);
        let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
        let start_level: Option<usize> = args.next().and_then(|a| a.parse().ok());

        let levels = builtin_levels();
        if levels.is_empty() {
            log::error!("No playable levels");
            return;
        }
        let level_count = levels.len();

        let path = progress_path();
        let mut progress = Progress::load_from(&path);
        let mut settings = Settings::default();
        if let Ok(name) = std::env::var("YARN_DASH_QUALITY") {
            match QualityPreset::parse(&name) {
                Some(quality) => settings.quality = quality,
                None => log::warn!("Unknown quality preset {:?}", name),
            }
        }
        log::info!(
            "Quality {} ({} particles)",
            settings.quality.as_str(),
            settings.max_particles()
        );

        let mut state = GameState::new(levels, load_tuning(), seed);
        state.apply_settings(&settings);
        state.set_unlocked_level(start_level.unwrap_or(progress.unlocked_level));
        state.continue_game();

        let mut driver = FixedStep::new();
        let mut elapsed = 0;
        while elapsed < ticks {
            elapsed += u64::from(driver.advance(&mut state, &scripted_input(elapsed), SIM_DT));

            for event in state.drain_events() {
                match event {
                    GameEvent::ProgressUnlocked { level } => {
                        if progress.record(level, level_count) {
                            if let Err(e) = progress.save_to(&path) {
                                log::warn!("Could not save progress: {}", e);
                            }
                        }
                    }
                    GameEvent::Jumped | GameEvent::Landed | GameEvent::Scratched => {
                        log::trace!("{:?}", event);
                    }
                    other => log::info!("[tick {}] {:?}", state.time_ticks, other),
                }
            }

            match state.status {
                GameStatus::GameOver => state.retry_level(),
                GameStatus::Victory => {
                    log::info!("Victory with score {}", state.score);
                    state.return_to_menu();
                    break;
                }
                _ => {}
            }
        }

        log::info!(
            "Finished after {} ticks: {:?}, level {:?}, score {}, lives {}",
            state.time_ticks,
            state.status,
            state.level_index(),
            state.score,
            state.lives
        );
    }
}
