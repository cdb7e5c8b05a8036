use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{NaturalKey, COL_AMOUNT, COL_DATE, COL_DESCRIPTION};

/// Reviewed transactions, backed by an append-only CSV log.
#[derive(Debug)]
pub struct ProcessedSet {
    path: PathBuf,
    keys: HashSet<NaturalKey>,
}

impl ProcessedSet {
    /// Load the log at `path`. A missing file is an empty set.
    pub fn load(path: &Path) -> Result<Self> {
        let mut keys = HashSet::new();
        if path.exists() {
            let mut rdr = csv::ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_path(path)?;
            let headers = rdr.headers()?.clone();
            let position = |name: &str| headers.iter().position(|h| h.trim() == name);
            let (date_idx, desc_idx, amount_idx) = (
                position(COL_DATE).unwrap_or(0),
                position(COL_DESCRIPTION).unwrap_or(1),
                position(COL_AMOUNT).unwrap_or(2),
            );
            for result in rdr.records() {
                let record = match result {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(error = %e, "skipping malformed processed-log row");
                        continue;
                    }
                };
                keys.insert(NaturalKey::new(
                    record.get(date_idx).unwrap_or(""),
                    record.get(desc_idx).unwrap_or(""),
                    record.get(amount_idx).unwrap_or(""),
                ));
            }
            info!(path = %path.display(), keys = keys.len(), "loaded processed log");
        } else {
            debug!(path = %path.display(), "no processed log, starting empty");
        }
        Ok(Self {
            path: path.to_path_buf(),
            keys,
        })
    }

    pub fn is_processed(&self, key: &NaturalKey) -> bool {
        self.keys.contains(key)
    }

    /// Append `key` to the log and the in-memory set. Returns false when the
    /// key was already recorded.
    pub fn mark_processed(&mut self, key: &NaturalKey) -> Result<bool> {
        if self.keys.contains(key) {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;
        let mut wtr = csv::Writer::from_writer(file);
        if needs_header {
            wtr.write_record([COL_DATE, COL_DESCRIPTION, COL_AMOUNT])?;
        }
        wtr.write_record([&key.date, &key.description, &key.amount])?;
        wtr.flush()?;
        self.keys.insert(key.clone());
        debug!(date = %key.date, description = %key.description, "marked processed");
        Ok(true)
    }

    /// Forget every processed key, deleting the log file.
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.keys.len();
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        self.keys.clear();
        info!(path = %self.path.display(), cleared = count, "cleared processed log");
        Ok(count)
    }

    /// Copy the log to `processed_transactions_backup_<timestamp>.csv` in
    /// `dir`. Returns `None` when there is no log to copy.
    pub fn backup(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::create_dir_all(dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("processed_transactions");
        let dest = dir.join(format!("{stem}_backup_{stamp}.csv"));
        std::fs::copy(&self.path, &dest)?;
        info!(dest = %dest.display(), "backed up processed log");
        Ok(Some(dest))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NaturalKey> {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(desc: &str) -> NaturalKey {
        NaturalKey::new("01/15/2025", desc, "-9.99")
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let set = ProcessedSet::load(&dir.path().join("processed.csv")).unwrap();
        assert!(set.is_empty());
        assert!(!set.is_processed(&key("SPOTIFY")));
    }

    #[test]
    fn test_mark_visible_immediately_and_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.csv");
        let mut set = ProcessedSet::load(&path).unwrap();
        assert!(set.mark_processed(&key("SPOTIFY")).unwrap());
        assert!(set.is_processed(&key("spotify")));

        let reloaded = ProcessedSet::load(&path).unwrap();
        assert!(reloaded.is_processed(&key("SPOTIFY")));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_log_is_append_only_with_single_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.csv");
        let mut set = ProcessedSet::load(&path).unwrap();
        set.mark_processed(&key("A")).unwrap();
        let mut set = ProcessedSet::load(&path).unwrap();
        set.mark_processed(&key("B")).unwrap();
        assert!(!set.mark_processed(&key("B")).unwrap());

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Transaction Date,Description,Amount",
                "01/15/2025,a,-9.99",
                "01/15/2025,b,-9.99",
            ]
        );
    }

    #[test]
    fn test_empty_log_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.csv");
        std::fs::write(&path, "").unwrap();
        let mut set = ProcessedSet::load(&path).unwrap();
        assert!(set.is_empty());
        set.mark_processed(&key("A")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Transaction Date,Description,Amount\n"));
        let reloaded = ProcessedSet::load(&path).unwrap();
        assert!(reloaded.is_processed(&key("A")));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_reads_log_without_amount_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.csv");
        std::fs::write(&path, "Transaction Date,Description\n01/15/2025,COFFEE\n").unwrap();
        let set = ProcessedSet::load(&path).unwrap();
        assert!(set.is_processed(&NaturalKey::new("01/15/2025", "coffee", "")));
    }

    #[test]
    fn test_clear_empties_memory_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.csv");
        let mut set = ProcessedSet::load(&path).unwrap();
        set.mark_processed(&key("A")).unwrap();
        set.mark_processed(&key("B")).unwrap();
        assert_eq!(set.clear().unwrap(), 2);
        assert!(set.is_empty());
        assert!(!path.exists());
        assert!(ProcessedSet::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_backup_copies_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed_transactions.csv");
        let mut set = ProcessedSet::load(&path).unwrap();
        assert_eq!(set.backup(dir.path()).unwrap(), None);

        set.mark_processed(&key("A")).unwrap();
        let dest = set.backup(&dir.path().join("backups")).unwrap().unwrap();
        let name = dest.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("processed_transactions_backup_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(
            std::fs::read_to_string(&dest).unwrap(),
            std::fs::read_to_string(&path).unwrap()
        );
    }
}
