//! Best clear times per level
//!
//! Persisted as JSON, keeps the fastest few clears of each level.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::settings::Level;

/// Maximum number of times kept per level
pub const MAX_BEST_TIMES: usize = 5;

/// A single clear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearEntry {
    /// Time from the end of the intro to leaving the field
    pub elapsed_ms: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Fastest clears, sorted ascending per level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BestTimes {
    pub levels: BTreeMap<Level, Vec<ClearEntry>>,
}

impl BestTimes {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    pub fn entries(&self, level: Level) -> &[ClearEntry] {
        self.levels.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if a time makes the table
    pub fn qualifies(&self, level: Level, elapsed_ms: u64) -> bool {
        let entries = self.entries(level);
        if entries.len() < MAX_BEST_TIMES {
            return true;
        }
        entries.last().is_none_or(|e| elapsed_ms < e.elapsed_ms)
    }

    /// Record a clear, returning its rank (1-indexed) or None if too slow
    pub fn record(&mut self, level: Level, elapsed_ms: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(level, elapsed_ms) {
            return None;
        }

        let entries = self.levels.entry(level).or_default();
        // Ties keep the earlier clear ahead
        let pos = entries
            .iter()
            .position(|e| elapsed_ms < e.elapsed_ms)
            .unwrap_or(entries.len());
        entries.insert(
            pos,
            ClearEntry {
                elapsed_ms,
                timestamp,
            },
        );
        entries.truncate(MAX_BEST_TIMES);

        log::info!("New best time for {}: rank {}", level.as_str(), pos + 1);
        Some(pos + 1)
    }

    /// Fastest clear of a level
    pub fn best(&self, level: Level) -> Option<u64> {
        self.entries(level).first().map(|e| e.elapsed_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.values().all(Vec::is_empty)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load best times from a JSON file, starting fresh when missing or broken
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(times) => {
                    log::info!("Loaded best times from {}", path.display());
                    return times;
                }
                Err(e) => log::warn!("Ignoring malformed best times {}: {}", path.display(), e),
            },
            Err(e) => log::debug!("No best times at {}: {}", path.display(), e),
        }

        log::info!("No best times found, starting fresh");
        Self::new()
    }

    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Best times saved");
        Ok(())
    }
}
