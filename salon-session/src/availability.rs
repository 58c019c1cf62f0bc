use crate::view::{ErrorKind, FormView};
use chrono::FixedOffset;
use salon_core::{AvailabilityQuery, BackendError, BookingBackend, ResponseOrdering};
use salon_shared::models::SlotSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const CHECKING: &str = "Checking availability…";
pub const SLOTS_UPDATED: &str = "Slots updated";
pub const FETCH_FAILED: &str = "Unable to fetch available times. Try again.";

/// What `apply` did with a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Rendered(usize),
    /// Fetch failed; an empty selector is showing.
    Failed,
    /// A newer answer was already on screen.
    Stale,
}

/// An issued availability request, detached from the client so several can
/// be in flight at once.
pub struct SlotFetch {
    seq: u64,
    query: AvailabilityQuery,
    backend: Arc<dyn BookingBackend>,
}

impl SlotFetch {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub async fn run(self) -> FetchResult {
        let outcome = self.backend.fetch_availability(&self.query).await;
        FetchResult {
            seq: self.seq,
            date: self.query.date,
            outcome,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub seq: u64,
    pub date: String,
    pub outcome: Result<SlotSet, BackendError>,
}

/// Owns the current slot set; the time selector only ever shows what this
/// client last rendered.
pub struct AvailabilityClient {
    backend: Arc<dyn BookingBackend>,
    ordering: ResponseOrdering,
    offset: FixedOffset,
    current: SlotSet,
    issued: u64,
    applied: u64,
}

impl AvailabilityClient {
    pub fn new(backend: Arc<dyn BookingBackend>, ordering: ResponseOrdering, offset: FixedOffset) -> Self {
        Self {
            backend,
            ordering,
            offset,
            current: SlotSet::empty(),
            issued: 0,
            applied: 0,
        }
    }

    pub fn current(&self) -> &SlotSet {
        &self.current
    }

    pub fn begin(&mut self, query: AvailabilityQuery, view: &mut FormView) -> SlotFetch {
        self.issued += 1;
        debug!("Availability request #{} for {}", self.issued, query.date);

        view.status.clear_error();
        view.submit.set_busy();
        view.status.set_status(CHECKING);

        SlotFetch {
            seq: self.issued,
            query,
            backend: self.backend.clone(),
        }
    }

    pub fn apply(&mut self, result: FetchResult, view: &mut FormView) -> Applied {
        if self.ordering == ResponseOrdering::LatestIssued && result.seq < self.applied {
            info!(
                "Discarding availability #{} for {}; #{} already shown",
                result.seq, result.date, self.applied
            );
            if self.applied == self.issued {
                view.submit.set_ready();
            }
            return Applied::Stale;
        }
        self.applied = self.applied.max(result.seq);

        match result.outcome {
            Ok(slots) => {
                let count = slots.len();
                self.render(slots, view);
                view.submit.set_ready();
                view.status.set_status(SLOTS_UPDATED);
                Applied::Rendered(count)
            }
            Err(e) => {
                warn!("Availability for {} failed: {}", result.date, e);
                view.show_error(ErrorKind::AvailabilityFetchFailed, FETCH_FAILED);
                self.render(SlotSet::empty(), view);
                Applied::Failed
            }
        }
    }

    pub async fn fetch_slots(&mut self, query: AvailabilityQuery, view: &mut FormView) -> Applied {
        let fetch = self.begin(query, view);
        let result = fetch.run().await;
        self.apply(result, view)
    }

    /// Shows slots that did not come from a fetch (conflict alternatives).
    /// Anything still in flight is treated as older, so nothing is left to
    /// wait for.
    pub fn replace(&mut self, slots: SlotSet, view: &mut FormView) {
        self.issued += 1;
        self.applied = self.issued;
        self.render(slots, view);
        view.submit.set_ready();
    }

    pub fn clear(&mut self, view: &mut FormView) {
        self.replace(SlotSet::empty(), view);
    }

    fn render(&mut self, slots: SlotSet, view: &mut FormView) {
        view.time.render(&slots, &self.offset);
        self.current = slots;
    }
}
