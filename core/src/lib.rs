//! Adherence core for the pill tracker.
//!
//! Local state (pills, per-month administration logs) synchronized against a
//! remote HTTP log/pill store. The [`AdherenceController`] owns everything
//! the calendar needs: it loads pills and logs, toggles doses idempotently,
//! and surfaces store failures as one dismissible banner.

pub mod calendar;
pub mod controller;
pub mod error;
pub mod log_index;
pub mod registry;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use calendar::{CalendarDay, CalendarMonth, DayType, DoseStatus};
pub use controller::{AdherenceController, DoseState};
pub use error::TrackerError;
pub use log_index::LogIndex;
pub use registry::PillRegistry;
pub use store::{HttpPillStore, PillStore, DEFAULT_STORE_URL};
