use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::session::SessionSettings;

/// User settings that survive between runs. Scores are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub questions_per_game: usize,
    pub seconds_per_question: u32,
    pub start_delay_ms: u64,
    /// Seconds to show the answer before moving on by itself; 0 waits for a key.
    pub auto_advance_secs: u64,
    pub questions_path: Option<PathBuf>,
    pub category: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_per_game: 10,
            seconds_per_question: 30,
            start_delay_ms: 1000,
            auto_advance_secs: 2,
            questions_path: None,
            category: None,
        }
    }
}

impl Config {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            total_questions: self.questions_per_game,
            seconds_per_question: self.seconds_per_question,
            start_delay: Duration::from_millis(self.start_delay_ms),
        }
    }

    pub fn auto_advance(&self) -> Option<Duration> {
        (self.auto_advance_secs > 0).then(|| Duration::from_secs(self.auto_advance_secs))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
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

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
