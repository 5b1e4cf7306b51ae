//! Local filesystem state file.
//!
//! The file is a JSON array of full conference records:
//!
//! ```text
//! [
//!   { "name": "...", "url": "...", "startDate": "2026-11-10", ... },
//!   ...
//! ]
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Conference;
use crate::pipeline::{Predicate, apply};
use crate::storage::StateStore;

/// State store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalStateFile {
    path: PathBuf,
}

impl LocalStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw announced set, returning None if the file doesn't exist.
    async fn read_announced(&self) -> Result<Option<Vec<Conference>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for LocalStateFile {
    async fn load(&self, today: &str) -> Vec<Conference> {
        let announced = match self.read_announced().await {
            Ok(Some(announced)) => announced,
            Ok(None) => {
                log::info!(
                    "No state file at {}, nothing announced yet",
                    self.path.display()
                );
                Vec::new()
            }
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable state file {}: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        };

        let stored = announced.len();
        let announced = apply(announced, &[Predicate::is_in_future(today)]);
        log::debug!(
            "Loaded {} announced conferences ({} past ones pruned)",
            announced.len(),
            stored - announced.len()
        );
        announced
    }

    async fn save(&self, announced: &[Conference]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(announced)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Saved {} announced conferences to {}",
            announced.len(),
            self.path.display()
        );
        Ok(())
    }
}
