use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{Result, StonestreetError};

/// Description-substring to label table, persisted as a JSON object.
///
/// Entries keep the order of the document so that, when one key is a
/// substring of another, the earlier entry wins consistently.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MappingStore {
    entries: Vec<(String, String)>,
}

pub fn normalize_key(description: &str) -> String {
    description.trim().to_lowercase()
}

impl MappingStore {
    /// A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no mapping file, starting empty");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json(&content)?;
        info!(path = %path.display(), mappings = store.len(), "loaded mappings");
        Ok(store)
    }

    /// Keys are normalized as they are read; when two keys collide the
    /// earlier one is kept.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: Map<String, Value> = serde_json::from_str(content)?;
        let mut entries: Vec<(String, String)> = Vec::with_capacity(raw.len());
        for (raw_key, value) in raw {
            let Value::String(label) = value else {
                warn!(key = %raw_key, value = %value, "ignoring non-string mapping value");
                continue;
            };
            let key = normalize_key(&raw_key);
            if key.is_empty() {
                warn!(key = %raw_key, "ignoring empty mapping key");
            } else if entries.iter().any(|(k, _)| *k == key) {
                warn!(key = %raw_key, "ignoring duplicate mapping key");
            } else {
                entries.push((key, label));
            }
        }
        Ok(Self { entries })
    }

    pub fn to_json(&self) -> Result<String> {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(&map, &mut ser)?;
        String::from_utf8(buf).map_err(|e| StonestreetError::Other(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, format!("{}\n", self.to_json()?))?;
        info!(path = %path.display(), mappings = self.len(), "saved mappings");
        Ok(())
    }

    /// Add or replace the mapping for a description. Returns the stored key.
    pub fn add(&mut self, description: &str, label: &str) -> Result<String> {
        let key = normalize_key(description);
        let label = label.trim();
        if key.is_empty() || label.is_empty() {
            return Err(StonestreetError::EmptyMapping);
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = label.to_string(),
            None => self.entries.push((key.clone(), label.to_string())),
        }
        Ok(key)
    }

    pub fn remove(&mut self, key: &str) -> Result<String> {
        let key = normalize_key(key);
        let pos = self
            .entries
            .iter()
            .position(|(k, _)| *k == key)
            .ok_or_else(|| StonestreetError::UnknownMapping(key.clone()))?;
        Ok(self.entries.remove(pos).1)
    }

    /// First label whose key occurs in `description`, case-insensitively.
    pub fn lookup(&self, description: &str) -> Option<&str> {
        let desc = description.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| desc.contains(k.as_str()))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
