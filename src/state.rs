use log::warn;

use crate::data::model::{columns, FilteredView, TripRecord};
use crate::data::pager;
use crate::error::Warning;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// One session iteration: the filtered view plus the raw-data cursor.
/// Discarded when the user restarts.
pub struct SessionState {
    pub view: FilteredView,

    /// View position of the next raw-data page.
    pub cursor: usize,
}

impl SessionState {
    pub fn new(view: FilteredView) -> Self {
        Self { view, cursor: 0 }
    }

    /// Non-fatal conditions of the current view.
    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.view.is_empty() {
            warnings.push(Warning::EmptyResult);
        }
        if !self.view.schema.has_gender {
            warnings.push(Warning::MissingColumn(columns::GENDER));
        }
        if !self.view.schema.has_birth_year {
            warnings.push(Warning::MissingColumn(columns::BIRTH_YEAR));
        }
        warnings
    }

    pub fn log_warnings(&self) {
        for warning in self.warnings() {
            warn!("{}: {warning}", self.view.selection);
        }
    }

    /// Return the next page with the view position of its first record, and
    /// advance the cursor. An empty page means the view is exhausted.
    pub fn next_page(&mut self) -> (usize, &[TripRecord]) {
        let start = self.cursor;
        let (records, next) = pager::page(self.view.records(), start);
        self.cursor = next;
        (start, records)
    }
}
