use crate::categorizer::{apply_mappings, CategorizeResult};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::mappings::MappingStore;
use crate::models::Transaction;
use crate::processed::ProcessedSet;

#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Moved,
    AtStart,
    AtEnd,
}

/// Cursor over the ledger rows being reviewed.
///
/// The view holds row indices into the ledger, so a label recorded here
/// always lands on the row that was shown.
pub struct Review<'a> {
    ledger: &'a mut Ledger,
    view: Vec<usize>,
    cursor: usize,
    hide_processed: bool,
}

impl<'a> Review<'a> {
    pub fn new(ledger: &'a mut Ledger, hide_processed: bool) -> Self {
        let mut review = Self {
            ledger,
            view: Vec::new(),
            cursor: 0,
            hide_processed,
        };
        review.rebuild_view();
        review
    }

    fn rebuild_view(&mut self) {
        self.view = if self.hide_processed {
            self.ledger.uncategorized()
        } else {
            (0..self.ledger.len()).collect()
        };
        self.cursor = 0;
    }

    pub fn set_hide_processed(&mut self, hide: bool) {
        self.hide_processed = hide;
        self.rebuild_view();
    }

    pub fn hides_processed(&self) -> bool {
        self.hide_processed
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Transaction> {
        self.view
            .get(self.cursor)
            .and_then(|&idx| self.ledger.transactions.get(idx))
    }

    pub fn next(&mut self) -> Step {
        if self.cursor + 1 < self.view.len() {
            self.cursor += 1;
            Step::Moved
        } else {
            Step::AtEnd
        }
    }

    pub fn prev(&mut self) -> Step {
        if self.cursor > 0 {
            self.cursor -= 1;
            Step::Moved
        } else {
            Step::AtStart
        }
    }

    /// Write `label` onto the current row and mark it processed. Returns
    /// false when the view is empty.
    pub fn record(&mut self, label: &str, processed: &mut ProcessedSet) -> Result<bool> {
        let Some(&idx) = self.view.get(self.cursor) else {
            return Ok(false);
        };
        self.ledger.assign(idx, label);
        let key = self.ledger.transactions[idx].natural_key();
        if !processed.is_processed(&key) {
            processed.mark_processed(&key)?;
        }
        Ok(true)
    }

    /// Map the current row's description to `label` and re-run the whole
    /// mapping store over the ledger. Returns the stored key.
    pub fn learn(&mut self, label: &str, mappings: &mut MappingStore) -> Result<(String, CategorizeResult)> {
        let description = self
            .current()
            .map(|t| t.description.clone())
            .unwrap_or_default();
        let key = mappings.add(&description, label)?;
        let result = apply_mappings(self.ledger, mappings);
        Ok((key, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Transaction Date,Amount,Credit Debit Indicator,type,Description,Category,Custom Identifier
01/15/2025,-42.10,Debit,debit,SAFEWAY #1,Shopping,Groceries
01/15/2025,-9.99,Debit,debit,SPOTIFY USA,Entertainment,
01/16/2025,-9.99,Debit,debit,SPOTIFY USA,Entertainment,
01/17/2025,-55.00,Debit,debit,SHELL OIL,Auto,
";

    fn ledger() -> Ledger {
        Ledger::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_hide_processed_view() {
        let mut ledger = ledger();
        let review = Review::new(&mut ledger, true);
        assert_eq!(review.len(), 3);
        assert_eq!(review.current().unwrap().description, "SPOTIFY USA");
    }

    #[test]
    fn test_navigation_bounds() {
        let mut ledger = ledger();
        let mut review = Review::new(&mut ledger, false);
        assert_eq!(review.prev(), Step::AtStart);
        assert_eq!(review.next(), Step::Moved);
        assert_eq!(review.next(), Step::Moved);
        assert_eq!(review.next(), Step::Moved);
        assert_eq!(review.next(), Step::AtEnd);
        assert_eq!(review.position(), 3);
    }

    #[test]
    fn test_record_labels_shown_row_and_marks_processed() {
        let dir = tempfile::tempdir().unwrap();
        let mut processed = ProcessedSet::load(&dir.path().join("p.csv")).unwrap();
        let mut ledger = ledger();
        {
            let mut review = Review::new(&mut ledger, true);
            review.next();
            assert!(review.record("Spotify", &mut processed).unwrap());
        }
        // Same date/description on row 1 is untouched; row 2 was shown.
        assert_eq!(ledger.transactions[1].custom_identifier, "");
        assert_eq!(ledger.transactions[2].custom_identifier, "Spotify");
        assert!(processed.is_processed(&ledger.transactions[2].natural_key()));
        assert!(!processed.is_processed(&ledger.transactions[1].natural_key()));
    }

    #[test]
    fn test_record_on_empty_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut processed = ProcessedSet::load(&dir.path().join("p.csv")).unwrap();
        let mut ledger = Ledger::default();
        let mut review = Review::new(&mut ledger, false);
        assert!(review.current().is_none());
        assert!(!review.record("X", &mut processed).unwrap());
        assert!(processed.is_empty());
    }

    #[test]
    fn test_learn_applies_to_all_rows() {
        let mut mappings = MappingStore::default();
        let mut ledger = ledger();
        {
            let mut review = Review::new(&mut ledger, true);
            let (key, result) = review.learn("Spotify", &mut mappings).unwrap();
            assert_eq!(key, "spotify usa");
            assert_eq!(result.matched, 2);
        }
        assert_eq!(ledger.transactions[1].custom_identifier, "Spotify");
        assert_eq!(ledger.transactions[2].custom_identifier, "Spotify");
        assert_eq!(ledger.transactions[0].custom_identifier, "Groceries");
    }

    #[test]
    fn test_toggle_resets_cursor() {
        let mut ledger = ledger();
        let mut review = Review::new(&mut ledger, false);
        review.next();
        review.set_hide_processed(true);
        assert_eq!(review.position(), 0);
        assert_eq!(review.len(), 3);
    }
}
