//! Best-score persistence
//!
//! A plain text file holding a single integer. Reading never fails: a
//! missing, unreadable or malformed file counts as 0, and a missing one is
//! created holding 0.

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FILENAME: &str = "highscore.txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine a data directory")]
    NoDataDir,
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The high-score file
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    /// Store at the platform data directory
    pub fn locate() -> Result<Self, StoreError> {
        let dirs = ProjectDirs::from("com", "combotris", "combotris").ok_or(StoreError::NoDataDir)?;
        Ok(Self::at(dirs.data_dir().join(FILENAME)))
    }

    /// Store at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored best score, 0 on any failure
    pub fn load(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(path = %self.path.display(), "malformed high score file, using 0");
                0
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no high score file, creating it");
                if let Err(e) = self.save(0) {
                    tracing::warn!(error = %e, "could not create high score file");
                }
                0
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable high score file, using 0");
                0
            }
        }
    }

    /// Overwrite the stored score, creating the file and its directory if needed
    pub fn save(&self, score: u64) -> Result<(), StoreError> {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, score.to_string())
        };
        write().map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
