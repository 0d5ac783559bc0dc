//! Orchestration of pills, logs, and the remote store.
//!
//! The controller is the sole writer of the registry and the log index.
//! Mutating operations (add pill, deactivate pill, toggle log) take `&mut
//! self`, so a new remote call can only be issued after the previous one has
//! settled; the read fetches on init and month change run concurrently since
//! they land in disjoint local state.

use std::sync::Arc;

use tracing::warn;

use shared::{DateKey, Month, Pill, DEFAULT_GIVEN_BY};

use crate::calendar::{build_month, CalendarMonth};
use crate::error::TrackerError;
use crate::log_index::LogIndex;
use crate::registry::PillRegistry;
use crate::store::PillStore;

/// State of one (pill, day) cell after a toggle round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoseState {
    Given,
    NotGiven,
}

/// Drives the adherence calendar for one session.
///
/// Failures of store-facing operations never escape to the caller: each one
/// is converted into a single dismissible banner message, replaced by the
/// latest failure and cleared automatically by the next successful
/// operation. Local state is never mutated before the store accepts a
/// change.
pub struct AdherenceController {
    store: Arc<dyn PillStore>,
    pills: PillRegistry,
    logs: LogIndex,
    month: Month,
    given_by: String,
    error: Option<String>,
    ready: bool,
}

impl AdherenceController {
    /// Controller focused on the current month. Call [`init`](Self::init)
    /// before rendering.
    pub fn new(store: Arc<dyn PillStore>) -> Self {
        Self::with_month(store, Month::current())
    }

    /// Controller focused on a specific month.
    pub fn with_month(store: Arc<dyn PillStore>, month: Month) -> Self {
        Self {
            pills: PillRegistry::new(store.clone()),
            logs: LogIndex::new(store.clone()),
            store,
            month,
            given_by: String::new(),
            error: None,
            ready: false,
        }
    }

    /// Initial load: pills and the focused month's logs, fetched
    /// concurrently. The calendar is ready once both have settled.
    pub async fn init(&mut self) {
        self.refresh().await;
    }

    /// Jump to an arbitrary month and reload.
    pub async fn show_month(&mut self, month: Month) {
        self.month = month;
        self.refresh().await;
    }

    /// Step the focused month forward (`+1`) or back (`-1`) and reload.
    pub async fn change_month(&mut self, delta: i32) {
        let mut month = self.month;
        for _ in 0..delta.unsigned_abs() {
            month = if delta < 0 { month.prev() } else { month.next() };
        }
        self.show_month(month).await;
    }

    async fn refresh(&mut self) {
        let range = self.month.range();
        self.logs.select_range(range);

        // The two reads land in disjoint local state, so they may overlap;
        // each failure surfaces its own banner message.
        let (pills, logs) = tokio::join!(self.pills.load_all(), self.logs.load_range(range));

        let mut failed = false;
        if let Err(e) = pills {
            self.surface(MSG_LOAD_PILLS, &e);
            failed = true;
        }
        if let Err(e) = logs {
            self.surface(MSG_LOAD_LOGS, &e);
            failed = true;
        }
        if !failed {
            self.error = None;
        }
        self.ready = true;
    }

    /// Toggle whether `pill_id` was given on `date`.
    ///
    /// Exactly one of create/delete is issued, decided by the loaded log
    /// set; the log set is then reloaded in full so local state converges
    /// with server truth. Returns the transition the store acknowledged, or
    /// `None` when the round-trip failed and the cell state is unchanged.
    pub async fn toggle(&mut self, pill_id: &str, date: DateKey) -> Option<DoseState> {
        if self.logs.is_given(pill_id, date) {
            match self.store.delete_log(pill_id, date).await {
                Ok(()) => {
                    self.reconcile_after_toggle().await;
                    Some(DoseState::NotGiven)
                }
                Err(e) => {
                    self.surface(MSG_TOGGLE, &e);
                    None
                }
            }
        } else {
            let request = shared::CreateLogRequest {
                pill_id: pill_id.to_string(),
                date,
                given_by: self.attribution(),
            };
            match self.store.create_log(request).await {
                Ok(_) => {
                    self.reconcile_after_toggle().await;
                    Some(DoseState::Given)
                }
                Err(e) => {
                    self.surface(MSG_TOGGLE, &e);
                    None
                }
            }
        }
    }

    async fn reconcile_after_toggle(&mut self) {
        // Full reload instead of a local patch: under a duplicate-create
        // race with another session, the post-reload server state wins.
        match self.logs.reconcile().await {
            Ok(()) => self.error = None,
            Err(e) => self.surface(MSG_LOAD_LOGS, &e),
        }
    }

    /// Add a pill by name, then refresh the pill list.
    pub async fn add_pill(&mut self, name: &str) -> Option<Pill> {
        let created = match self.pills.add(name).await {
            Ok(pill) => pill,
            Err(e @ TrackerError::Validation(_)) => {
                let message = e.to_string();
                self.surface(&message, &e);
                return None;
            }
            Err(e) => {
                self.surface(MSG_ADD_PILL, &e);
                return None;
            }
        };
        match self.pills.load_all().await {
            Ok(()) => self.error = None,
            Err(e) => self.surface(MSG_LOAD_PILLS, &e),
        }
        Some(created)
    }

    /// Deactivate a pill, then refresh the pill list. The pill disappears
    /// from the active set; its historical logs are untouched.
    pub async fn deactivate_pill(&mut self, pill_id: &str) -> Option<Pill> {
        let updated = match self.pills.deactivate(pill_id).await {
            Ok(pill) => pill,
            Err(e) => {
                self.surface(MSG_REMOVE_PILL, &e);
                return None;
            }
        };
        match self.pills.load_all().await {
            Ok(()) => self.error = None,
            Err(e) => self.surface(MSG_LOAD_PILLS, &e),
        }
        Some(updated)
    }

    /// Free-text attribution applied to subsequent toggles.
    pub fn set_given_by(&mut self, label: impl Into<String>) {
        self.given_by = label.into();
    }

    fn attribution(&self) -> String {
        let trimmed = self.given_by.trim();
        if trimmed.is_empty() {
            DEFAULT_GIVEN_BY.to_string()
        } else {
            trimmed.to_string()
        }
    }

    fn surface(&mut self, message: &str, source: &TrackerError) {
        warn!(error = %source, "{message}");
        self.error = Some(message.to_string());
    }

    /// The current banner message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// True once the initial pill and log fetches have both settled.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn is_given(&self, pill_id: &str, date: DateKey) -> bool {
        self.logs.is_given(pill_id, date)
    }

    pub fn active_pills(&self) -> Vec<&Pill> {
        self.pills.active_pills()
    }

    pub fn pills(&self) -> &PillRegistry {
        &self.pills
    }

    pub fn logs(&self) -> &LogIndex {
        &self.logs
    }

    /// View-model of the focused month for rendering.
    pub fn calendar_month(&self) -> CalendarMonth {
        build_month(self.month, &self.pills.active_pills(), &self.logs)
    }
}

const MSG_LOAD_PILLS: &str = "Failed to load pills. Make sure the backend is running.";
const MSG_LOAD_LOGS: &str = "Failed to load pill logs. Make sure the backend is running.";
const MSG_ADD_PILL: &str = "Failed to add pill. Make sure the backend is running.";
const MSG_REMOVE_PILL: &str = "Failed to remove pill. Make sure the backend is running.";
const MSG_TOGGLE: &str = "Failed to update pill log. Make sure the backend is running.";
