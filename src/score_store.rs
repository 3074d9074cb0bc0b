//! Best-score persistence.
//!
//! One JSON file per storage key under the data directory. Reads never fail:
//! a missing or malformed file is simply "no record yet".

use std::fs;
use std::path::PathBuf;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const BONEBLADE_KEY: &str = "boneblade_td_arc";
pub const SQUIG_LEADERBOARD_KEY: &str = "squigrun.leaderboard";
pub const CLASSIC_KEY: &str = "squig.classic";

/// Entries kept on the Squig Run leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Clone, Debug)]
pub struct ScoreStore {
    dir: PathBuf,
}

impl ScoreStore {
    pub fn new(dir: impl Into<PathBuf>) -> ScoreStore {
        ScoreStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.path_for(key);
        let Ok(text) = fs::read_to_string(&path) else {
            debug!("no record at {}", path.display());
            return T::default();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("ignoring malformed record {}: {e}", path.display());
            T::default()
        })
    }

    pub fn save<T: Serialize>(&self, key: &str, record: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        let text = serde_json::to_string(record)?;
        fs::write(&path, text).map_err(|source| StoreError::Write { path, source })
    }

    /// `save`, logging instead of returning the error. Persistence is
    /// fire-and-forget from the frame loop's point of view.
    pub fn save_or_warn<T: Serialize>(&self, key: &str, record: &T) {
        if let Err(e) = self.save(key, record) {
            warn!("best score not saved: {e}");
        }
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// Boneblade's best wave and best score, tracked independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    pub wave: u32,
    pub score: u32,
}

impl BestRecord {
    /// Takes whichever fields of the candidate improved on the record.
    /// Returns `true` when anything changed.
    pub fn merge(&mut self, wave: u32, score: u32) -> bool {
        if wave > self.wave || score > self.score {
            self.wave = self.wave.max(wave);
            self.score = self.score.max(score);
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestDistance {
    pub distance: u32,
}

impl BestDistance {
    pub fn merge(&mut self, distance: u32) -> bool {
        if distance > self.distance {
            self.distance = distance;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderEntry {
    pub name: String,
    pub score: u32,
}

/// Top scores, best first, never longer than `LEADERBOARD_SIZE`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderEntry>,
}

impl Leaderboard {
    pub fn entries(&self) -> &[LeaderEntry] {
        &self.entries
    }

    pub fn best(&self) -> u32 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    pub fn qualifies(&self, score: u32) -> bool {
        match self.entries.last() {
            _ if self.entries.len() < LEADERBOARD_SIZE => true,
            Some(lowest) => score > lowest.score,
            None => true,
        }
    }

    /// Inserts and keeps the board sorted and capped. The sort is stable, so
    /// on a tie the older entry stays ahead.
    pub fn insert(&mut self, name: impl Into<String>, score: u32) {
        self.entries.push(LeaderEntry {
            name: name.into(),
            score,
        });
        self.normalize();
    }

    /// Restores the sorted, capped shape after loading hand-edited data.
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_SIZE);
    }
}
