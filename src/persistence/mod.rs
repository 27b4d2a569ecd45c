//! Level progress persistence
//!
//! The only thing saved between sessions is the highest level the player
//! may continue from, stored as a bare integer under [`Progress::STORAGE_KEY`].
//! The value only ever goes up.

use serde::{Deserialize, Serialize};

/// Highest unlocked level index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub unlocked_level: usize,
}

impl Progress {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "yarn_dash_unlocked_level";

    /// Read a stored value. Missing data is level 0; malformed data is
    /// level 0 with a warning.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match raw.trim().parse::<usize>() {
            Ok(unlocked_level) => Self { unlocked_level },
            Err(e) => {
                log::warn!("Ignoring malformed progress {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    /// Stored representation
    pub fn encode(&self) -> String {
        self.unlocked_level.to_string()
    }

    /// Record that `level` is now reachable. Only strictly higher values
    /// within the level list are kept. Returns true if progress changed and
    /// should be saved.
    pub fn record(&mut self, level: usize, level_count: usize) -> bool {
        if level >= level_count || level <= self.unlocked_level {
            return false;
        }
        log::info!("Unlocked level {}", level);
        self.unlocked_level = level;
        true
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let raw = storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let progress = Self::parse(raw.as_deref());
        log::info!("Loaded progress: level {}", progress.unlocked_level);
        progress
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(Self::STORAGE_KEY, &self.encode()).is_err() {
                log::warn!("Failed to save progress");
            }
        }
    }

    /// Load progress from a file. A missing or unreadable file is level 0.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(Some(&raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Could not read progress from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(path, self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse() {
        assert_eq!(Progress::parse(None).unlocked_level, 0);
        assert_eq!(Progress::parse(Some("2")).unlocked_level, 2);
        assert_eq!(Progress::parse(Some(" 3\n")).unlocked_level, 3);
        assert_eq!(Progress::parse(Some("banana")).unlocked_level, 0);
        assert_eq!(Progress::parse(Some("-1")).unlocked_level, 0);
        assert_eq!(Progress::parse(Some("")).unlocked_level, 0);
    }

    #[test]
    fn test_record_only_moves_up() {
        let mut progress = Progress::default();
        assert!(progress.record(1, 4));
        assert!(!progress.record(1, 4));
        assert!(!progress.record(0, 4));
        assert!(progress.record(3, 4));
        assert!(!progress.record(4, 4));
        assert_eq!(progress.unlocked_level, 3);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("yarn_dash_progress_{}", std::process::id()));
        assert_eq!(Progress::load_from(&path), Progress::default());

        let progress = Progress { unlocked_level: 2 };
        progress.save_to(&path).unwrap();
        assert_eq!(Progress::load_from(&path), progress);
        std::fs::remove_file(&path).unwrap();
    }

    proptest! {
        #[test]
        fn prop_progress_is_monotonic(
            writes in prop::collection::vec(0usize..10, 0..40),
            level_count in 1usize..8,
        ) {
            let mut progress = Progress::default();
            let mut last = progress.unlocked_level;
            for level in writes {
                let changed = progress.record(level, level_count);
                prop_assert!(progress.unlocked_level >= last);
                prop_assert!(progress.unlocked_level < level_count);
                prop_assert_eq!(changed, progress.unlocked_level != last);
                last = progress.unlocked_level;
            }
        }
    }
}
