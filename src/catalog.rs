//! Level catalog: the embedded default levels or a JSON file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::types::LevelConfig;

const DEFAULT_CATALOG: &str = include_str!("../levels/default.json");

/// An ordered, validated list of levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    levels: Vec<LevelConfig>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(DEFAULT_CATALOG).context("embedded level catalog")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read level catalog {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("level catalog {}", path.display()))
    }

    /// Parse a JSON array of levels. Every level is validated and ids must be
    /// unique.
    pub fn from_json(text: &str) -> Result<Self> {
        let levels: Vec<LevelConfig> = serde_json::from_str(text).context("parse levels")?;
        if levels.is_empty() {
            bail!("catalog has no levels");
        }
        for (i, level) in levels.iter().enumerate() {
            level.validate()?;
            if levels[..i].iter().any(|l| l.id == level.id) {
                bail!("duplicate level id {}", level.id);
            }
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }

    pub fn get(&self, id: &str) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn first(&self) -> &LevelConfig {
        // Non-empty by construction.
        &self.levels[0]
    }
}
