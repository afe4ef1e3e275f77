//! Best-run record tracking
//!
//! Persisted to a JSON file, keeps the top 10 completed runs ranked by
//! depth reached, then by completion time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of run records to keep
pub const MAX_RECORDS: usize = 10;

/// A single completed (or abandoned) run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    /// Deepest floor reached, 1-based
    pub floor: u32,
    /// Seconds of play across completed floors
    pub total_time: f32,
    /// Enemies killed over the run
    pub kills: u32,
    /// Deaths over the run
    pub deaths: u32,
    /// Run seed, so a record run can be replayed
    pub seed: u64,
    /// Unix timestamp (secs) when achieved
    pub timestamp: u64,
}

impl RunEntry {
    /// Ranking order: deeper floors first, faster times break ties
    fn beats(&self, other: &RunEntry) -> bool {
        self.floor > other.floor || (self.floor == other.floor && self.total_time < other.total_time)
    }
}

/// Best-run record table
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunRecords {
    pub entries: Vec<RunEntry>,
}

impl RunRecords {
    /// Create an empty record table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run qualifies for the table
    pub fn qualifies(&self, entry: &RunEntry) -> bool {
        if entry.floor == 0 {
            return false;
        }
        if self.entries.len() < MAX_RECORDS {
            return true;
        }
        self.entries.last().map(|e| entry.beats(e)).unwrap_or(true)
    }

    /// Get the rank a run would achieve (1-indexed, None if it doesn't
    /// qualify)
    pub fn potential_rank(&self, entry: &RunEntry) -> Option<usize> {
        if !self.qualifies(entry) {
            return None;
        }
        let rank = self.entries.iter().position(|e| entry.beats(e));
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a run to the table (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_run(&mut self, entry: RunEntry) -> Option<usize> {
        if !self.qualifies(&entry) {
            return None;
        }

        // Insertion point, sorted best-first
        let pos = self.entries.iter().position(|e| entry.beats(e));
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_RECORDS);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best run on record (if any)
    pub fn best(&self) -> Option<&RunEntry> {
        self.entries.first()
    }

    /// Load records from disk, starting fresh on any error
    pub fn load(path: &Path) -> Self {
        if let Ok(json) = fs::read_to_string(path) {
            if let Ok(records) = serde_json::from_str::<RunRecords>(&json) {
                log::info!("loaded {} run records", records.entries.len());
                return records;
            }
            log::warn!("corrupt records file, starting fresh");
        } else {
            log::info!("no records file, starting fresh");
        }
        Self::new()
    }

    /// Save records to disk (best effort)
    pub fn save(&self, path: &Path) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            match fs::write(path, json) {
                Ok(()) => log::info!("run records saved ({} entries)", self.entries.len()),
                Err(e) => log::warn!("failed to save run records: {e}"),
            }
        }
    }
}
