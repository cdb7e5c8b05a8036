use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StonestreetError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,
    #[serde(default = "default_mapping_file")]
    pub mapping_file: String,
    #[serde(default = "default_processed_file")]
    pub processed_file: String,
    #[serde(default = "default_true")]
    pub seed_fallback_rules: bool,
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,
}

fn default_ledger_file() -> String {
    "phatstacks.csv".to_string()
}

fn default_mapping_file() -> String {
    "description_identifier_mapping.json".to_string()
}

fn default_processed_file() -> String {
    "processed_transactions.csv".to_string()
}

fn default_true() -> bool {
    true
}

fn default_labels() -> Vec<String> {
    let mut labels: Vec<String> = [
        "Rent", "Phone", "Philo", "Spotify", "Peacock", "Youtube", "Canva",
        "Microsoft Office", "Xbox", "Adobe", "Fuel", "Car wash", "USAA", "Groceries",
        "Vitamins", "Coffee", "LMNT", "Toothpaste", "Amazon", "Eating out", "Other",
        "Burn Bootcamp", "Planet Fitness", "National Academy", "Income", "Savings",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    labels.sort();
    labels
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            ledger_file: default_ledger_file(),
            mapping_file: default_mapping_file(),
            processed_file: default_processed_file(),
            seed_fallback_rules: true,
            labels: default_labels(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("stonestreet")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("stonestreet")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "unreadable settings, using defaults");
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| StonestreetError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file() -> PathBuf {
    settings_path()
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

/// Resolved locations of every file a command touches.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub ledger: PathBuf,
    pub mappings: PathBuf,
    pub processed: PathBuf,
}

impl DataPaths {
    /// Command-line overrides win over settings. A relative `--ledger` is
    /// taken as given rather than joined onto the data directory.
    pub fn resolve(settings: &Settings, data_dir: Option<&str>, ledger: Option<&str>) -> Self {
        let data_dir = PathBuf::from(data_dir.map(shellexpand_path).unwrap_or_else(|| settings.data_dir.clone()));
        let ledger = match ledger {
            Some(p) => PathBuf::from(shellexpand_path(p)),
            None => data_dir.join(&settings.ledger_file),
        };
        Self {
            mappings: data_dir.join(&settings.mapping_file),
            processed: data_dir.join(&settings.processed_file),
            ledger,
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("settings.json"));
        assert_eq!(s.ledger_file, "phatstacks.csv");
        assert!(s.seed_fallback_rules);
        assert!(s.labels.contains(&"Groceries".to_string()));
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/test", "ledger_file": "bank.csv"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.ledger_file, "bank.csv");
        assert_eq!(s.mapping_file, "description_identifier_mapping.json");
        assert_eq!(s.processed_file, "processed_transactions.csv");
    }

    #[test]
    fn test_load_falls_back_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{{{").unwrap();
        let s = load_settings_from(&path);
        assert_eq!(s.processed_file, "processed_transactions.csv");
    }

    #[test]
    fn test_default_labels_sorted() {
        let labels = default_labels();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
        assert_eq!(labels.len(), 26);
    }

    #[test]
    fn test_resolve_paths() {
        let settings = Settings {
            data_dir: "/data".to_string(),
            ..Settings::default()
        };
        let paths = DataPaths::resolve(&settings, None, None);
        assert_eq!(paths.ledger, PathBuf::from("/data/phatstacks.csv"));
        assert_eq!(paths.mappings, PathBuf::from("/data/description_identifier_mapping.json"));
        assert_eq!(paths.processed, PathBuf::from("/data/processed_transactions.csv"));

        let dir = tempfile::tempdir().unwrap();
        let override_dir = dir.path().to_string_lossy().to_string();
        let paths = DataPaths::resolve(&settings, Some(&override_dir), None);
        assert!(paths.processed.ends_with("processed_transactions.csv"));
        assert!(paths.processed.starts_with(std::fs::canonicalize(dir.path()).unwrap()));
    }
}
