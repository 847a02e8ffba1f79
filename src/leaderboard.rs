//! Leaderboard collaborator.
//!
//! The store itself is external; the game only submits final scores (without
//! waiting) and shows an optimistically merged top five.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;

/// Size of the displayed leaderboard.
pub const TOP_N: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

pub trait Leaderboard: Send + Sync {
    /// Highest scores first; equal scores keep arrival order.
    fn list_top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;

    fn submit_score(&self, name: &str, score: u32) -> Result<bool, LeaderboardError>;
}

fn rank(entries: &[ScoreEntry], limit: usize) -> Vec<ScoreEntry> {
    let mut ranked = entries.to_vec();
    // Stable sort keeps arrival order among ties.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

/// Client-side merge of a fresh score into the displayed board: one best
/// score per name, descending, at most [`TOP_N`] entries.
pub fn merge_top_scores(current: &[ScoreEntry], entry: ScoreEntry) -> Vec<ScoreEntry> {
    let mut merged: Vec<ScoreEntry> = Vec::with_capacity(current.len() + 1);
    for candidate in current.iter().cloned().chain(std::iter::once(entry)) {
        match merged.iter_mut().find(|e| e.name == candidate.name) {
            Some(existing) => existing.score = existing.score.max(candidate.score),
            None => merged.push(candidate),
        }
    }
    rank(&merged, TOP_N)
}

// ── In-memory ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    entries: Mutex<Vec<ScoreEntry>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ScoreEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn list_top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let entries = self.entries.lock().map_err(|_| LeaderboardError::Poisoned)?;
        Ok(rank(&entries, limit))
    }

    fn submit_score(&self, name: &str, score: u32) -> Result<bool, LeaderboardError> {
        let mut entries = self.entries.lock().map_err(|_| LeaderboardError::Poisoned)?;
        entries.push(ScoreEntry::new(name, score));
        Ok(true)
    }
}

// ── JSON file ─────────────────────────────────────────────────────────────────

/// Every submission appended to a JSON array on disk.
#[derive(Debug)]
pub struct FileLeaderboard {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty board, and so is malformed JSON.  Any other
    /// read failure is an error, so a later write can't clobber the file.
    fn read_entries(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cannot read leaderboard file");
                return Err(err.into());
            }
        };
        match serde_json::from_str(&text) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring malformed leaderboard file");
                Ok(Vec::new())
            }
        }
    }
}

impl Leaderboard for FileLeaderboard {
    fn list_top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let _guard = self.lock.lock().map_err(|_| LeaderboardError::Poisoned)?;
        Ok(rank(&self.read_entries()?, limit))
    }

    fn submit_score(&self, name: &str, score: u32) -> Result<bool, LeaderboardError> {
        let _guard = self.lock.lock().map_err(|_| LeaderboardError::Poisoned)?;
        let mut entries = self.read_entries()?;
        entries.push(ScoreEntry::new(name, score));
        let text = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, text)?;
        Ok(true)
    }
}

// ── Fire-and-forget reporter ──────────────────────────────────────────────────

/// Hands scores to a background worker so the game never waits on the store.
/// Failures are logged there and go no further.
#[derive(Debug)]
pub struct ScoreReporter {
    tx: Option<Sender<ScoreEntry>>,
    worker: Option<JoinHandle<()>>,
}

impl ScoreReporter {
    pub fn spawn(board: Arc<dyn Leaderboard>) -> Self {
        let (tx, rx) = mpsc::channel::<ScoreEntry>();
        let worker = thread::spawn(move || {
            for entry in rx {
                match board.submit_score(&entry.name, entry.score) {
                    Ok(true) => {
                        tracing::info!(name = %entry.name, score = entry.score, "score submitted")
                    }
                    Ok(false) => {
                        tracing::warn!(name = %entry.name, score = entry.score, "leaderboard rejected score")
                    }
                    Err(err) => {
                        tracing::warn!(name = %entry.name, score = entry.score, error = %err, "score submission failed")
                    }
                }
            }
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queue a submission.  Never blocks.
    pub fn report(&self, entry: ScoreEntry) {
        let Some(tx) = &self.tx else { return };
        if tx.send(entry).is_err() {
            tracing::warn!("score reporter worker has stopped");
        }
    }

    /// Finish queued submissions and stop the worker.
    pub fn shutdown(mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("score reporter worker panicked");
            }
        }
    }
}

impl Drop for ScoreReporter {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit on its own.
        self.tx.take();
    }
}
