use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::ScanError;

/// Durable last-scanned-block pointer, stored as ASCII decimal text.
///
/// Loading is tolerant: a missing or corrupted file falls back to the
/// configured starting block, which can only cause already-scanned blocks to
/// be re-scanned, never unseen ones to be skipped. Saving is not tolerant:
/// a failed write makes progress untrackable and must stop the process.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self, default_block: u64) -> u64 {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(
                    "no checkpoint at {}: {}, starting from block {}",
                    self.path.display(),
                    err,
                    default_block
                );
                return default_block;
            }
        };

        match contents.trim().parse::<u64>() {
            Ok(block) => {
                info!("resuming from checkpoint at block {}", block);
                block
            }
            Err(err) => {
                warn!(
                    "corrupted checkpoint in {}: {}, starting from block {}",
                    self.path.display(),
                    err,
                    default_block
                );
                default_block
            }
        }
    }

    pub fn save(&self, block: u64) -> Result<(), ScanError> {
        fs::write(&self.path, block.to_string())?;
        Ok(())
    }
}
