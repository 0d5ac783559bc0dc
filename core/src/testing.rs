//! In-memory `PillStore` used by the unit tests: behaves like a well-behaved
//! remote store, records every request it sees, and can be told to fail the
//! next call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use shared::{CreateLogRequest, CreatePillRequest, DateKey, LogEntry, Pill, UpdatePillRequest};

use crate::error::{Result, TrackerError};
use crate::store::PillStore;

/// One request observed by the store, with dates in canonical wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    ListPills,
    CreatePill(String),
    UpdatePill {
        pill_id: String,
        active: bool,
    },
    ListLogs {
        start: String,
        end: String,
    },
    CreateLog {
        pill_id: String,
        date: String,
        given_by: String,
    },
    DeleteLog {
        pill_id: String,
        date: String,
    },
}

#[derive(Default)]
struct State {
    pills: Vec<Pill>,
    logs: Vec<LogEntry>,
    calls: Vec<RecordedCall>,
    fail_next: Option<String>,
}

pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State::default()),
        })
    }

    pub fn seed_pill(&self, id: &str, name: &str, active: bool) {
        self.state.lock().unwrap().pills.push(Pill {
            id: id.to_string(),
            name: name.to_string(),
            active,
        });
    }

    pub fn seed_log(&self, pill_id: &str, date: DateKey, given_by: &str) {
        self.state.lock().unwrap().logs.push(LogEntry {
            pill_id: pill_id.to_string(),
            date,
            given_by: given_by.to_string(),
        });
    }

    /// Make the next store call fail with `StoreUnavailable(message)`.
    pub fn fail_next(&self, message: &str) {
        self.state.lock().unwrap().fail_next = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn pills(&self) -> Vec<Pill> {
        self.state.lock().unwrap().pills.clone()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.state.lock().unwrap().logs.clone()
    }
}

#[async_trait]
impl PillStore for MemoryStore {
    async fn list_pills(&self) -> Result<Vec<Pill>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::ListPills);
        if let Some(message) = state.fail_next.take() {
            return Err(TrackerError::StoreUnavailable(message));
        }
        Ok(state.pills.clone())
    }

    async fn create_pill(&self, request: CreatePillRequest) -> Result<Pill> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(RecordedCall::CreatePill(request.name.clone()));
        if let Some(message) = state.fail_next.take() {
            return Err(TrackerError::StoreUnavailable(message));
        }
        let pill = Pill {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name,
            active: true,
        };
        state.pills.push(pill.clone());
        Ok(pill)
    }

    async fn update_pill(&self, pill_id: &str, request: UpdatePillRequest) -> Result<Pill> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::UpdatePill {
            pill_id: pill_id.to_string(),
            active: request.active,
        });
        if let Some(message) = state.fail_next.take() {
            return Err(TrackerError::StoreUnavailable(message));
        }
        let pill = state
            .pills
            .iter_mut()
            .find(|p| p.id == pill_id)
            .ok_or_else(|| TrackerError::NotFound(format!("pill {pill_id}")))?;
        pill.active = request.active;
        Ok(pill.clone())
    }

    async fn list_logs(&self, start: DateKey, end: DateKey) -> Result<Vec<LogEntry>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::ListLogs {
            start: start.to_string(),
            end: end.to_string(),
        });
        if let Some(message) = state.fail_next.take() {
            return Err(TrackerError::StoreUnavailable(message));
        }
        Ok(state
            .logs
            .iter()
            .filter(|log| start <= log.date && log.date <= end)
            .cloned()
            .collect())
    }

    async fn create_log(&self, request: CreateLogRequest) -> Result<LogEntry> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::CreateLog {
            pill_id: request.pill_id.clone(),
            date: request.date.to_string(),
            given_by: request.given_by.clone(),
        });
        if let Some(message) = state.fail_next.take() {
            return Err(TrackerError::StoreUnavailable(message));
        }
        // One entry per pill per day; a duplicate create is rejected the way
        // a real store enforcing the unique constraint would.
        if state
            .logs
            .iter()
            .any(|log| log.matches(&request.pill_id, request.date))
        {
            return Err(TrackerError::StoreUnavailable(format!(
                "log already exists for pill {} on {}",
                request.pill_id, request.date
            )));
        }
        let entry = LogEntry {
            pill_id: request.pill_id,
            date: request.date,
            given_by: request.given_by,
        };
        state.logs.push(entry.clone());
        Ok(entry)
    }

    async fn delete_log(&self, pill_id: &str, date: DateKey) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall::DeleteLog {
            pill_id: pill_id.to_string(),
            date: date.to_string(),
        });
        if let Some(message) = state.fail_next.take() {
            return Err(TrackerError::StoreUnavailable(message));
        }
        let before = state.logs.len();
        state.logs.retain(|log| !log.matches(pill_id, date));
        if state.logs.len() == before {
            return Err(TrackerError::NotFound(format!(
                "log for pill {pill_id} on {date}"
            )));
        }
        Ok(())
    }
}
