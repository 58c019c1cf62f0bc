use salon_core::DraftStorage;
use salon_shared::models::{BookingDraft, DraftKey};
use std::sync::Arc;
use tracing::{debug, warn};

/// Best-effort persistence of form drafts. Failures are logged, never
/// surfaced: a lost draft costs the customer some typing, nothing more.
#[derive(Clone)]
pub struct DraftStore {
    storage: Arc<dyn DraftStorage>,
}

impl DraftStore {
    pub fn new(storage: Arc<dyn DraftStorage>) -> Self {
        Self { storage }
    }

    pub async fn save(&self, key: &DraftKey, draft: &BookingDraft) {
        let raw = match serde_json::to_string(draft) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Draft save failed for {}: {}", key, e);
                return;
            }
        };
        match self.storage.put(&key.storage_key(), &raw).await {
            Ok(()) => debug!("Draft saved for {}", key),
            Err(e) => warn!("Draft save failed for {}: {}", key, e),
        }
    }

    /// Malformed records read as "no draft".
    pub async fn load(&self, key: &DraftKey) -> Option<BookingDraft> {
        let raw = match self.storage.get(&key.storage_key()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Draft load failed for {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!("Ignoring malformed draft for {}: {}", key, e);
                None
            }
        }
    }

    pub async fn clear(&self, key: &DraftKey) {
        if let Err(e) = self.storage.delete(&key.storage_key()).await {
            warn!("Draft clear failed for {}: {}", key, e);
        }
    }
}
