//! Item catalog: an append-only JSON map from item code to description
//!
//! Codes already present are never overwritten; a missing or corrupt file
//! starts from an empty map.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct ItemCatalog {
    path: PathBuf,
}

/// Outcome of recording one item
#[derive(Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    Added(String),
    AlreadyPresent(String),
    MissingCode,
}

impl ItemCatalog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pull `itemCode`/`itemDescription` out of a nutrition payload and
    /// append it if the code is new
    pub fn record_item(&self, payload: &str) -> Result<RecordOutcome> {
        let parsed: Value = match serde_json::from_str(payload) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(RecordOutcome::MissingCode),
        };
        let Some(code) = parsed.get("itemCode").and_then(Value::as_str) else {
            return Ok(RecordOutcome::MissingCode);
        };
        let description = parsed
            .get("itemDescription")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let mut items = self.load()?;
        if items.contains_key(code) {
            debug!("Item {} already in catalog", code);
            return Ok(RecordOutcome::AlreadyPresent(code.to_string()));
        }

        items.insert(code.to_string(), description.to_string());
        self.save(&items)?;
        debug!("Item {} added to catalog", code);
        Ok(RecordOutcome::Added(code.to_string()))
    }

    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read catalog file: {}", self.path.display()))?;
        match serde_json::from_str(&contents) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("Catalog file {} is corrupt ({}), starting empty", self.path.display(), e);
                Ok(BTreeMap::new())
            }
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create catalog directory")?;
        }
        let temp = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(items).context("Failed to serialize catalog")?;
        fs::write(&temp, json).context("Failed to write temp catalog file")?;
        fs::rename(&temp, &self.path).context("Failed to rename catalog file")?;
        Ok(())
    }
}
