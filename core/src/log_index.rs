use std::sync::Arc;

use tracing::debug;

use shared::{DateKey, LogEntry, MonthRange};

use crate::error::Result;
use crate::store::PillStore;

/// Authoritative log set for the currently displayed month range.
///
/// The index never patches itself after a mutation; convergence comes from
/// reloading the whole range, so the loaded set always reflects something the
/// store actually returned.
pub struct LogIndex {
    store: Arc<dyn PillStore>,
    /// Range the UI is currently displaying. Set synchronously on navigation.
    selected: Option<MonthRange>,
    logs: Vec<LogEntry>,
}

impl LogIndex {
    pub fn new(store: Arc<dyn PillStore>) -> Self {
        Self {
            store,
            selected: None,
            logs: Vec::new(),
        }
    }

    /// Mark `range` as the one the UI is displaying. Load results for any
    /// other range are discarded from now on.
    pub fn select_range(&mut self, range: MonthRange) {
        self.selected = Some(range);
    }

    pub fn selected_range(&self) -> Option<MonthRange> {
        self.selected
    }

    /// Fetch logs for `range` and replace the local set with them.
    ///
    /// Returns `Ok(false)` when the result arrived for a range that is no
    /// longer selected; the fetch is then discarded rather than applied, so a
    /// slow load for a superseded month can never clobber the current one.
    /// On failure the previously loaded set is left intact.
    pub async fn load_range(&mut self, range: MonthRange) -> Result<bool> {
        let logs = self.store.list_logs(range.start, range.end).await?;
        if self.selected != Some(range) {
            debug!(start = %range.start, end = %range.end, "discarding log load for superseded range");
            return Ok(false);
        }
        debug!(count = logs.len(), start = %range.start, end = %range.end, "loaded logs");
        self.logs = logs;
        Ok(true)
    }

    /// Reload the selected range in full. Called after every successful
    /// toggle so local state converges with server truth, also under
    /// concurrent edits from other sessions.
    pub async fn reconcile(&mut self) -> Result<()> {
        if let Some(range) = self.selected {
            self.load_range(range).await?;
        }
        Ok(())
    }

    /// Whether an entry with the composite identity `(pill_id, date)` exists
    /// in the loaded set. Days outside the loaded range read as not given by
    /// absence, which is sound because the calendar never renders them.
    pub fn is_given(&self, pill_id: &str, date: DateKey) -> bool {
        self.logs.iter().any(|log| log.matches(pill_id, date))
    }

    pub fn entry(&self, pill_id: &str, date: DateKey) -> Option<&LogEntry> {
        self.logs.iter().find(|log| log.matches(pill_id, date))
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.logs
    }
}
