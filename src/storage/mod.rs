//! # Persisted State
//!
//! Store abstractions for the two pieces of durable state, config and
//! history, so the core stays testable without a real backend. `FileStorage`
//! keeps wholesale-JSON files under a data directory; `MemoryStorage` is the
//! in-process fake injected in tests.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::history::History;

const DATA_DIR: &str = ".apiprobe";
const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.json";

/// Durable storage for the client configuration.
///
/// `load` returns `Ok(None)` when nothing has been persisted yet; an absent
/// config means "unconfigured" and blocks execution.
pub trait ConfigStore {
    fn load(&self) -> Result<Option<Config>, String>;
    fn save(&self, config: &Config) -> Result<(), String>;
}

/// Durable storage for the execution history, written wholesale on every
/// mutation.
pub trait HistoryStore {
    fn load(&self) -> Result<History, String>;
    fn save(&self, history: &History) -> Result<(), String>;
}

impl<T: ConfigStore> ConfigStore for Arc<T> {
    fn load(&self) -> Result<Option<Config>, String> {
        (**self).load()
    }

    fn save(&self, config: &Config) -> Result<(), String> {
        (**self).save(config)
    }
}

impl<T: HistoryStore> HistoryStore for Arc<T> {
    fn load(&self) -> Result<History, String> {
        (**self).load()
    }

    fn save(&self, history: &History) -> Result<(), String> {
        (**self).save(history)
    }
}

/// JSON files under a data directory, one per concern.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `.apiprobe/` in the working directory.
    pub fn new() -> Self {
        let dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DATA_DIR);
        Self { dir }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| format!("Failed to create data directory `{}`: {e}", self.dir.display()))
    }

    fn write_json<T: serde::Serialize>(&self, file_name: &str, value: &T) -> Result<(), String> {
        self.ensure_dir()?;
        let file = self.dir.join(file_name);
        let raw = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to serialize `{file_name}`: {e}"))?;
        fs::write(&file, raw).map_err(|e| format!("Failed to write `{}`: {e}", file.display()))
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, file_name: &str) -> Result<Option<T>, String> {
        let file = self.dir.join(file_name);
        if !file.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&file)
            .map_err(|e| format!("Failed to read `{}`: {e}", file.display()))?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| format!("Failed to parse `{}`: {e}", file.display()))
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileStorage {
    fn load(&self) -> Result<Option<Config>, String> {
        self.read_json(CONFIG_FILE)
    }

    fn save(&self, config: &Config) -> Result<(), String> {
        self.write_json(CONFIG_FILE, config)
    }
}

impl HistoryStore for FileStorage {
    fn load(&self) -> Result<History, String> {
        Ok(self.read_json(HISTORY_FILE)?.unwrap_or_default())
    }

    fn save(&self, history: &History) -> Result<(), String> {
        self.write_json(HISTORY_FILE, history)
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    config: Mutex<Option<Config>>,
    history: Mutex<History>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config: Mutex::new(Some(config)),
            history: Mutex::new(History::new()),
        }
    }

    /// Number of entries currently persisted, for test assertions.
    pub fn history_len(&self) -> usize {
        self.history.lock().map(|history| history.len()).unwrap_or(0)
    }
}

impl ConfigStore for MemoryStorage {
    fn load(&self) -> Result<Option<Config>, String> {
        self.config
            .lock()
            .map(|config| config.clone())
            .map_err(|_| "Config store poisoned".to_string())
    }

    fn save(&self, config: &Config) -> Result<(), String> {
        self.config
            .lock()
            .map(|mut slot| *slot = Some(config.clone()))
            .map_err(|_| "Config store poisoned".to_string())
    }
}

impl HistoryStore for MemoryStorage {
    fn load(&self) -> Result<History, String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .map_err(|_| "History store poisoned".to_string())
    }

    fn save(&self, history: &History) -> Result<(), String> {
        self.history
            .lock()
            .map(|mut slot| *slot = history.clone())
            .map_err(|_| "History store poisoned".to_string())
    }
}
