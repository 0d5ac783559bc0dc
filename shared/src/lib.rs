//! Shared domain and wire types for the pill tracker.
//!
//! Everything that crosses the HTTP boundary to the pill/log store lives
//! here, so the client core and the frontend agree on one set of shapes.

use serde::{Deserialize, Serialize};

mod date;

pub use date::{DateKey, DateParseError, Month, MonthRange};

/// Attribution recorded on a log entry when the "given by" field is blank.
pub const DEFAULT_GIVEN_BY: &str = "User";

/// A tracked medication regimen for the animal.
///
/// Pills are never hard-deleted through this system: removal sets
/// `active = false` so historical log entries keep a valid referent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pill {
    /// Opaque identifier assigned by the store on creation.
    pub id: String,
    /// Display name, trimmed of surrounding whitespace before submission.
    pub name: String,
    /// Whether the pill appears in the calendar and accepts new logs.
    pub active: bool,
}

/// A record that a pill was administered on a specific calendar day.
///
/// Identity is the `(pill_id, date)` pair; at most one entry exists per pill
/// per day. There is no update-in-place: entries are only ever created or
/// deleted by a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(alias = "pillId")]
    pub pill_id: String,
    /// The calendar day the dose was given; never a timestamp.
    pub date: DateKey,
    #[serde(alias = "givenBy")]
    pub given_by: String,
}

/// Body of `POST /pills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePillRequest {
    pub name: String,
}

/// Body of `PUT /pills/{id}`. The only mutation the store accepts on a pill
/// is flipping the active flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePillRequest {
    pub active: bool,
}

/// Body of `POST /logs`.
///
/// The store expects camelCase keys on this request even though log
/// responses come back snake_case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    pub pill_id: String,
    pub date: DateKey,
    pub given_by: String,
}

impl LogEntry {
    /// Whether this entry records the given pill/day pair.
    pub fn matches(&self, pill_id: &str, date: DateKey) -> bool {
        self.pill_id == pill_id && self.date == date
    }
}
