use std::sync::Arc;

use tracing::{debug, info};

use shared::{CreatePillRequest, Pill, UpdatePillRequest};

use crate::error::{Result, TrackerError};
use crate::store::PillStore;

/// Authoritative in-memory pill set for the current session.
///
/// All mutation goes through a store round-trip; the local set is only
/// touched after the store has accepted the change, so a failed call leaves
/// the previously loaded pills intact.
pub struct PillRegistry {
    store: Arc<dyn PillStore>,
    pills: Vec<Pill>,
}

impl PillRegistry {
    pub fn new(store: Arc<dyn PillStore>) -> Self {
        Self {
            store,
            pills: Vec::new(),
        }
    }

    /// Replace the local set with the full result from the store.
    pub async fn load_all(&mut self) -> Result<()> {
        let pills = self.store.list_pills().await?;
        debug!(count = pills.len(), "loaded pills");
        self.pills = pills;
        Ok(())
    }

    /// Create a pill. The name is trimmed first; an empty result is rejected
    /// before any network call is made.
    pub async fn add(&mut self, name: &str) -> Result<Pill> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::Validation(
                "pill name cannot be empty".to_string(),
            ));
        }
        let created = self
            .store
            .create_pill(CreatePillRequest {
                name: name.to_string(),
            })
            .await?;
        info!(pill_id = %created.id, name = %created.name, "added pill");
        self.merge(created.clone());
        Ok(created)
    }

    /// Soft-remove a pill: sets `active = false` server-side and mirrors the
    /// updated record locally. Historical logs keep referencing the id.
    pub async fn deactivate(&mut self, pill_id: &str) -> Result<Pill> {
        let updated = self
            .store
            .update_pill(pill_id, UpdatePillRequest { active: false })
            .await?;
        info!(pill_id = %updated.id, "deactivated pill");
        self.merge(updated.clone());
        Ok(updated)
    }

    fn merge(&mut self, pill: Pill) {
        match self.pills.iter_mut().find(|p| p.id == pill.id) {
            Some(existing) => *existing = pill,
            None => self.pills.push(pill),
        }
    }

    /// Pills eligible for display and logging. The filter always runs on the
    /// flag as received, not on any assumption about server-side filtering.
    pub fn active_pills(&self) -> Vec<&Pill> {
        self.pills.iter().filter(|p| p.active).collect()
    }

    pub fn all(&self) -> &[Pill] {
        &self.pills
    }

    pub fn get(&self, pill_id: &str) -> Option<&Pill> {
        self.pills.iter().find(|p| p.id == pill_id)
    }
}
