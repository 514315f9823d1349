//! High score persistence
//!
//! The only durable state is a single decimal integer in a text file.
//! Failures never reach the game: a missing or malformed file reads as 0
//! and write errors are logged and dropped.

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Somewhere the best score survives between runs
pub trait HighScoreStore {
    /// Previously saved high score, 0 if there is none
    fn load(&self) -> u64;
    /// Persist a new high score
    fn save(&mut self, value: u64);
}

/// High score kept in a plain text file
#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: PathBuf,
}

impl FileHighScore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `high_score.txt` in the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "brickfall", "brickfall")
            .map(|dirs| dirs.data_dir().join("high_score.txt"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read the leading integer of the file contents
fn parse_score(contents: &str) -> Option<u64> {
    contents.split_whitespace().next()?.parse().ok()
}

impl HighScoreStore for FileHighScore {
    fn load(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(contents) => parse_score(&contents).unwrap_or_else(|| {
                tracing::warn!("Ignoring malformed high score file {}", self.path.display());
                0
            }),
            Err(e) => {
                tracing::debug!("No high score at {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save(&mut self, value: u64) {
        if let Some(dir) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                tracing::warn!("Failed to create {}: {}", dir.display(), e);
                return;
            }
        }
        match fs::write(&self.path, value.to_string()) {
            Ok(()) => tracing::debug!("Saved high score {} to {}", value, self.path.display()),
            Err(e) => tracing::warn!("Failed to save high score to {}: {}", self.path.display(), e),
        }
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    pub value: u64,
    pub saves: u32,
}

#[cfg(test)]
impl HighScoreStore for MemoryHighScore {
    fn load(&self) -> u64 {
        self.value
    }

    fn save(&mut self, value: u64) {
        self.value = value;
        self.saves += 1;
    }
}
