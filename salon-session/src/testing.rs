//! Fakes shared by the session tests.

use crate::session::{BookingSession, SessionDeps, SessionSettings};
use crate::submission::Confirm;
use crate::location::Location;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use salon_core::{
    AvailabilityQuery, BackendError, BookingBackend, DraftStorage, ManualClock, SubmitResponse,
};
use salon_shared::models::{BookingPayload, HoldLookupResponse, SlotSet};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LookupHold(String),
    Availability(AvailabilityQuery),
    Submit(BookingPayload),
}

/// Scripted backend. Unknown tokens are 404, unknown dates have no slots.
#[derive(Default)]
pub struct FakeBackend {
    holds: Mutex<HashMap<String, Result<HoldLookupResponse, BackendError>>>,
    slots: Mutex<HashMap<String, Result<Vec<String>, BackendError>>>,
    submit: Mutex<Option<Result<SubmitResponse, BackendError>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hold(self, token: &str, expires_in_secs: i64) -> Self {
        let body = serde_json::json!({
            "valid": true,
            "token": token,
            "expires_at": (t0() + Duration::seconds(expires_in_secs)).to_rfc3339(),
            "prefill": { "name": "Ana Prefill", "phone": "0700", "email": "ana@example.com", "service": "cut" }
        });
        self.with_hold_body(token, Ok(serde_json::from_value(body).unwrap()))
    }

    pub fn with_hold_body(self, token: &str, body: Result<HoldLookupResponse, BackendError>) -> Self {
        self.holds.lock().unwrap().insert(token.to_string(), body);
        self
    }

    pub fn with_slots(self, date: &str, slots: &[&str]) -> Self {
        let slots = slots.iter().map(|s| s.to_string()).collect();
        self.slots.lock().unwrap().insert(date.to_string(), Ok(slots));
        self
    }

    pub fn with_slot_error(self, date: &str, err: BackendError) -> Self {
        self.slots.lock().unwrap().insert(date.to_string(), Err(err));
        self
    }

    pub fn respond_to_submit(&self, status: u16, body: &str) {
        *self.submit.lock().unwrap() = Some(Ok(SubmitResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail_submit(&self, err: BackendError) {
        *self.submit.lock().unwrap() = Some(Err(err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submit_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Submit(_)))
            .count()
    }

    pub fn availability_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Availability(_)))
            .count()
    }
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn lookup_hold(&self, token: &str) -> Result<HoldLookupResponse, BackendError> {
        self.calls.lock().unwrap().push(Call::LookupHold(token.to_string()));
        self.holds
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .unwrap_or(Err(BackendError::Status(404)))
    }

    async fn fetch_availability(&self, query: &AvailabilityQuery) -> Result<SlotSet, BackendError> {
        self.calls.lock().unwrap().push(Call::Availability(query.clone()));
        match self.slots.lock().unwrap().get(&query.date).cloned() {
            Some(Ok(slots)) => Ok(SlotSet::from_wire(slots)),
            Some(Err(e)) => Err(e),
            None => Ok(SlotSet::empty()),
        }
    }

    async fn submit_booking(&self, payload: &BookingPayload) -> Result<SubmitResponse, BackendError> {
        self.calls.lock().unwrap().push(Call::Submit(payload.clone()));
        self.submit
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(BackendError::Transport("no response scripted".to_string())))
    }
}

/// In-memory draft storage that can be told to fail.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    fn check(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("quota exceeded".into());
        }
        Ok(())
    }
}

#[async_trait]
impl DraftStorage for MemoryStorage {
    async fn put(&self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.check()?;
        self.insert_raw(key, value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.check()?;
        Ok(self.raw(key))
    }

    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.check()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Answers every confirmation prompt the same way and counts them.
pub struct FixedConfirm {
    answer: bool,
    asked: Arc<AtomicUsize>,
}

impl FixedConfirm {
    pub fn new(answer: bool) -> (Self, Arc<AtomicUsize>) {
        let asked = Arc::new(AtomicUsize::new(0));
        (Self { answer, asked: asked.clone() }, asked)
    }
}

#[async_trait]
impl Confirm for FixedConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

pub struct Harness {
    pub session: BookingSession,
    pub backend: Arc<FakeBackend>,
    pub storage: Arc<MemoryStorage>,
    pub clock: Arc<ManualClock>,
    pub prompts: Arc<AtomicUsize>,
}

pub fn harness(backend: FakeBackend, url: &str, confirm: bool) -> Harness {
    harness_with_storage(backend, Arc::new(MemoryStorage::new()), url, confirm)
}

pub fn harness_with_storage(
    backend: FakeBackend,
    storage: Arc<MemoryStorage>,
    url: &str,
    confirm: bool,
) -> Harness {
    let backend = Arc::new(backend);
    let clock = Arc::new(ManualClock::new(t0()));
    let (confirm, prompts) = FixedConfirm::new(confirm);

    let session = BookingSession::new(
        SessionDeps {
            backend: backend.clone(),
            storage: storage.clone(),
            clock: clock.clone(),
            confirm: Box::new(confirm),
        },
        SessionSettings::default(),
        Location::parse(url).unwrap(),
    )
    .unwrap();

    Harness {
        session,
        backend,
        storage,
        clock,
        prompts,
    }
}
