use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_TICK_RATE_MS: u64 = 5;
pub const MAX_TICK_RATE_MS: u64 = 100;

/// Host-side preferences. Passed to the app at construction; the game core
/// never reads these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// draw a cursor marker on the playfield
    pub custom_cursor: bool,
    /// floating tier labels and particle bursts
    pub show_feedback: bool,
    /// ring the terminal bell on every hit
    pub hitsound_bell: bool,
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_cursor: true,
            show_feedback: true,
            hitsound_bell: false,
            tick_rate_ms: 16,
        }
    }
}

impl Settings {
    pub fn clamped_tick_rate(&self) -> u64 {
        self.tick_rate_ms.clamp(MIN_TICK_RATE_MS, MAX_TICK_RATE_MS)
    }
}

pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new() -> Self {
        let path = match ProjectDirs::from("", "", "hitcircle") {
            Some(pd) => pd.config_dir().join("settings.json"),
            None => PathBuf::from("hitcircle_settings.json"),
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        let Ok(bytes) = fs::read(&self.path) else {
            return Settings::default();
        };
        serde_json::from_slice::<Settings>(&bytes).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings at {}: {}", self.path.display(), e);
            Settings::default()
        })
    }

    fn save(&self, settings: &Settings) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, data)
    }
}

/// In-memory store, for tests and `--no-save` style runs.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    saved: std::cell::RefCell<Option<Settings>>,
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Settings {
        self.saved.borrow().clone().unwrap_or_default()
    }

    fn save(&self, settings: &Settings) -> std::io::Result<()> {
        *self.saved.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = FileSettingsStore::with_path(dir.path().join("settings.json"));
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn save_and_load_custom_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = FileSettingsStore::with_path(&path);
        let settings = Settings {
            custom_cursor: false,
            show_feedback: false,
            hitsound_bell: true,
            tick_rate_ms: 30,
        };
        store.save(&settings).unwrap();
        assert!(path.exists());
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn corrupt_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(FileSettingsStore::with_path(&path).load(), Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, br#"{"hitsound_bell": true}"#).unwrap();
        let loaded = FileSettingsStore::with_path(&path).load();
        assert!(loaded.hitsound_bell);
        assert_eq!(loaded.tick_rate_ms, 16);
    }

    #[test]
    fn tick_rate_is_clamped() {
        let mut s = Settings::default();
        s.tick_rate_ms = 0;
        assert_eq!(s.clamped_tick_rate(), MIN_TICK_RATE_MS);
        s.tick_rate_ms = 1000;
        assert_eq!(s.clamped_tick_rate(), MAX_TICK_RATE_MS);
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.load(), Settings::default());
        let s = Settings {
            hitsound_bell: true,
            ..Settings::default()
        };
        store.save(&s).unwrap();
        assert_eq!(store.load(), s);
    }
}
