//! Per-level best results, persisted as JSON.
//!
//! The file maps level id to `{ "stars": n, "score": n }`. Updates keep the
//! maximum of the stored and new value for stars and score independently.
//! There is a single writer per attempt, so the read-modify-write is not
//! locked.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::Completion;

/// Environment variable overriding the record file location.
pub const RECORDS_PATH_ENV: &str = "MATCH3_RECORDS_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelRecord {
    pub stars: u8,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    path: PathBuf,
    records: BTreeMap<String, LevelRecord>,
}

impl RecordStore {
    /// Open the store at `path`. A missing or unreadable file yields an empty
    /// store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                warn!("ignoring corrupt record file {}: {err}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, level_id: &str) -> Option<LevelRecord> {
        self.records.get(level_id).copied()
    }

    pub fn records(&self) -> &BTreeMap<String, LevelRecord> {
        &self.records
    }

    /// Merge a completion into the record for `level_id` and write the file.
    /// Returns the stored record.
    pub fn record_completion(&mut self, level_id: &str, completion: Completion) -> Result<LevelRecord> {
        let entry = self.records.entry(level_id.to_string()).or_default();
        entry.stars = entry.stars.max(completion.stars);
        entry.score = entry.score.max(completion.score);
        let stored = *entry;
        self.save()?;
        Ok(stored)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, text).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

/// Record file location: `MATCH3_RECORDS_PATH`, else
/// `$XDG_CONFIG_HOME/tui-match3/records.json`, else
/// `~/.config/tui-match3/records.json`, else `./records.json`.
pub fn default_records_path() -> PathBuf {
    use std::env;

    if let Some(p) = env::var(RECORDS_PATH_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        return PathBuf::from(p);
    }
    let config_dir = env::var_os("XDG_CONFIG_HOME")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")));
    match config_dir {
        Some(dir) => dir.join("tui-match3").join("records.json"),
        None => PathBuf::from("records.json"),
    }
}
