//! Last-run outcome persistence.
//!
//! The menu scene wants to know how the previous run ended, exactly
//! once: reading the outcome clears it, so a stale result can never leak
//! into a later session. The file store writes a tiny marker file under
//! the platform data directory; the memory store backs tests.

use std::fs;
use std::path::{Path, PathBuf};

use skyrace_flight::{OutcomeSink, RunOutcome};

/// In-memory outcome slot with read-once semantics.
#[derive(Debug, Default)]
pub struct MemoryOutcomeStore {
    slot: Option<RunOutcome>,
}

impl MemoryOutcomeStore {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and clear the stored outcome.
    pub fn take(&mut self) -> Option<RunOutcome> {
        self.slot.take()
    }
}

impl OutcomeSink for MemoryOutcomeStore {
    fn record(&mut self, outcome: RunOutcome) {
        self.slot = Some(outcome);
    }
}

/// File-backed outcome store: one marker file holding "win" or "lose".
#[derive(Debug, Clone)]
pub struct FileOutcomeStore {
    path: PathBuf,
}

impl FileOutcomeStore {
    /// A store persisting at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store persisting alongside the rest of the session state in
    /// `dir`, so `--config-dir` keeps runs fully self-contained.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("last_outcome"))
    }

    /// Where the marker file lives.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and clear the persisted outcome. Unreadable or unrecognized
    /// content reads as `None`; the file is removed either way.
    pub fn take(&mut self) -> Option<RunOutcome> {
        let content = fs::read_to_string(&self.path).ok()?;
        if let Err(error) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), %error, "Failed to clear outcome file");
        }
        match content.trim() {
            "win" => Some(RunOutcome::Win),
            "lose" => Some(RunOutcome::Lose),
            other => {
                tracing::warn!(content = other, "Unrecognized outcome marker");
                None
            }
        }
    }
}

impl OutcomeSink for FileOutcomeStore {
    /// Persisting is fire-and-forget from the lifecycle's point of view;
    /// a write failure is logged, never fatal mid-run.
    fn record(&mut self, outcome: RunOutcome) {
        if let Some(parent) = self.path.parent()
            && let Err(error) = fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), %error, "Failed to create outcome dir");
            return;
        }
        if let Err(error) = fs::write(&self.path, outcome.as_str()) {
            tracing::warn!(path = %self.path.display(), %error, "Failed to persist outcome");
        }
    }
}
