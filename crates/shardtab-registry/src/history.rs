//! Append-only record of the shard keys already materialized per entity.
//!
//! Date-range entities resolve against "now", so a later run may compute a
//! different key list than an earlier one. Merging with the history keeps
//! every table ever created registered, in resolution order.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use shardtab_commons::{EntityLabel, ShardKey};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Persisted label → materialized shard keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardHistory {
    #[serde(default)]
    entities: BTreeMap<EntityLabel, Vec<ShardKey>>,
}

/// Outcome of merging freshly resolved keys with the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMerge {
    /// Union of historic and resolved keys, in resolved order
    pub keys: Vec<ShardKey>,
    /// Historic keys the current resolution no longer produces
    pub retained: usize,
    /// Resolved keys that were not in the history
    pub added: usize,
}

impl ShardHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`. A missing file is an empty history.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No shard history at {}, starting empty", path.display());
                return Ok(Self::default());
            },
            Err(e) => {
                return Err(RegistryError::History(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            },
        };

        serde_json::from_str(&content).map_err(|e| {
            RegistryError::History(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Write to `path` through a sibling temp file and rename.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                RegistryError::History(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RegistryError::History(format!("Failed to encode history: {}", e)))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|e| {
                RegistryError::History(format!("Failed to write {}: {}", path.display(), e))
            })
    }

    pub fn keys_for(&self, label: &EntityLabel) -> &[ShardKey] {
        self.entities.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Combine the stored keys of `label` with `resolved` without touching
    /// the history itself.
    ///
    /// The result follows the resolved order. A historic key the resolution
    /// no longer produces is placed right before the first resolved key that
    /// followed it in the history, or at the end when none did.
    pub fn merge(&self, label: &EntityLabel, resolved: &[ShardKey]) -> HistoryMerge {
        let historic = self.keys_for(label);
        let resolved_set: HashSet<&ShardKey> = resolved.iter().collect();
        let historic_set: HashSet<&ShardKey> = historic.iter().collect();

        // resolved key → historic-only keys that preceded it in the history
        let mut anchored: HashMap<&ShardKey, Vec<&ShardKey>> = HashMap::new();
        let mut pending: Vec<&ShardKey> = Vec::new();
        for key in historic {
            if resolved_set.contains(key) {
                if !pending.is_empty() {
                    anchored.entry(key).or_default().append(&mut pending);
                }
            } else {
                pending.push(key);
            }
        }

        let mut seen: HashSet<&ShardKey> = HashSet::with_capacity(historic.len() + resolved.len());
        let mut keys = Vec::with_capacity(historic.len() + resolved.len());
        let mut retained = 0;
        let mut added = 0;

        for key in resolved {
            if let Some(before) = anchored.remove(key) {
                for old in before {
                    if seen.insert(old) {
                        retained += 1;
                        keys.push(old.clone());
                    }
                }
            }
            if seen.insert(key) {
                if !historic_set.contains(key) {
                    added += 1;
                }
                keys.push(key.clone());
            }
        }
        for old in pending {
            if seen.insert(old) {
                retained += 1;
                keys.push(old.clone());
            }
        }

        HistoryMerge { keys, retained, added }
    }

    /// Replace the stored keys of `label`.
    pub fn record(&mut self, label: &EntityLabel, keys: Vec<ShardKey>) {
        self.entities.insert(label.clone(), keys);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
