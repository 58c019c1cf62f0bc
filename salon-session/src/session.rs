use crate::availability::{Applied, AvailabilityClient, FetchResult, SlotFetch};
use crate::draft_store::DraftStore;
use crate::form::{BookingForm, Field};
use crate::hold_session::{HoldEvent, HoldResolution, HoldSession};
use crate::location::Location;
use crate::submission::{self, Confirm, SubmissionController, SubmissionOutcome, SubmissionState, SubmitContext};
use crate::view::{ErrorKind, FormView};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use salon_core::calendar;
use salon_core::{AvailabilityQuery, BookingBackend, Clock, CoreError, CoreResult, DraftStorage, ResponseOrdering};
use salon_shared::models::{BookingDraft, Hold, SlotSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid confirmation path {path:?}: {source}")]
    ConfirmationPath {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Resolved against the booking page URL.
    pub confirmation_path: String,
    /// Offset used to label slots in the time selector.
    pub display_offset: FixedOffset,
    pub ordering: ResponseOrdering,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            confirmation_path: "thanks.html".to_string(),
            display_offset: Utc.fix(),
            ordering: ResponseOrdering::default(),
        }
    }
}

pub struct SessionDeps {
    pub backend: Arc<dyn BookingBackend>,
    pub storage: Arc<dyn DraftStorage>,
    pub clock: Arc<dyn Clock>,
    pub confirm: Box<dyn Confirm>,
}

/// How the page came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStart {
    Anonymous { restored: bool },
    Held { expires_at: DateTime<Utc>, restored: bool },
    InvalidLink,
    Lapsed,
}

/// One booking page: the form, what it shows, and every component that
/// acts on them.
pub struct BookingSession {
    form: BookingForm,
    view: FormView,
    location: Location,
    hold: HoldSession,
    availability: AvailabilityClient,
    drafts: DraftStore,
    submission: SubmissionController,
    clock: Arc<dyn Clock>,
    confirm: Box<dyn Confirm>,
    /// Drafted slot waiting for availability to offer it again.
    pending_time: Option<String>,
}

impl BookingSession {
    pub fn new(deps: SessionDeps, settings: SessionSettings, location: Location) -> Result<Self, SessionError> {
        let confirmation_base = location
            .current()
            .join(&settings.confirmation_path)
            .map_err(|source| SessionError::ConfirmationPath {
                path: settings.confirmation_path.clone(),
                source,
            })?;

        let drafts = DraftStore::new(deps.storage);
        Ok(Self {
            form: BookingForm::default(),
            view: FormView::default(),
            location,
            hold: HoldSession::new(deps.backend.clone(), drafts.clone(), deps.clock.clone()),
            availability: AvailabilityClient::new(deps.backend.clone(), settings.ordering, settings.display_offset),
            drafts,
            submission: SubmissionController::new(deps.backend, confirmation_base),
            clock: deps.clock,
            confirm: deps.confirm,
            pending_time: None,
        })
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    /// Direct access for callers that fill the form without the autosave.
    pub fn form_mut(&mut self) -> &mut BookingForm {
        &mut self.form
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn hold(&self) -> Option<&Hold> {
        self.hold.hold()
    }

    pub fn slots(&self) -> &SlotSet {
        self.availability.current()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission.state()
    }

    /// Page load: resolve the link, prefill, restore the draft.
    pub async fn start(&mut self) -> SessionStart {
        match self.hold.resolve_from_url(&mut self.location, &mut self.view).await {
            HoldResolution::Anonymous { draft } => {
                let restored = self.restore(draft).await;
                SessionStart::Anonymous { restored }
            }
            HoldResolution::Acquired { hold, draft } => {
                self.form.apply_prefill(&hold.prefill);
                let restored = self.restore(draft).await;
                SessionStart::Held {
                    expires_at: hold.expires_at,
                    restored,
                }
            }
            HoldResolution::InvalidLink => SessionStart::InvalidLink,
            HoldResolution::Lapsed => SessionStart::Lapsed,
        }
    }

    async fn restore(&mut self, draft: Option<BookingDraft>) -> bool {
        let draft = match draft {
            Some(draft) => draft,
            None => return false,
        };
        info!("Restoring draft saved at {}", draft.saved_at);
        self.form.apply_draft(&draft);

        // The drafted slot only comes back if availability still offers it
        self.pending_time = Some(std::mem::take(&mut self.form.time)).filter(|t| !t.is_empty());
        if calendar::ensure_business_day(&self.form.date).is_ok() {
            self.refresh_slots().await;
        } else {
            self.pending_time = None;
        }
        true
    }

    /// Text inputs. Date, service and time go through their own handlers.
    pub async fn set_field(&mut self, field: Field, value: &str) {
        match field {
            Field::Date => {
                if let Err(e) = self.change_date(value).await {
                    debug!("Date not accepted: {}", e);
                }
            }
            Field::Service => {
                self.change_service(value).await;
            }
            Field::Time => {
                self.select_time(value).await;
            }
            _ => {
                self.form.set(field, value);
                self.save_draft().await;
            }
        }
    }

    pub async fn change_date(&mut self, date: &str) -> CoreResult<Applied> {
        match calendar::ensure_business_day(date) {
            Ok(_) => {
                self.form.date = date.to_string();
                let applied = self.refresh_slots().await;
                self.save_draft().await;
                Ok(applied)
            }
            Err(e) => {
                if let CoreError::ClosedDay(_) = e {
                    self.form.date.clear();
                    self.view.show_error(ErrorKind::Validation, submission::CLOSED_DAY);
                } else {
                    self.form.date = date.to_string();
                }
                self.form.time.clear();
                self.pending_time = None;
                self.availability.clear(&mut self.view);
                self.save_draft().await;
                Err(e)
            }
        }
    }

    /// Refetches when a bookable date is already chosen.
    pub async fn change_service(&mut self, service: &str) -> Option<Applied> {
        self.form.service = service.to_string();
        let applied = if calendar::ensure_business_day(&self.form.date).is_ok() {
            Some(self.refresh_slots().await)
        } else {
            None
        };
        self.save_draft().await;
        applied
    }

    /// Only values from the current slot set are selectable; empty clears.
    pub async fn select_time(&mut self, value: &str) -> bool {
        if !value.is_empty() && !self.availability.current().contains_value(value) {
            debug!("Ignoring unknown slot {}", value);
            return false;
        }
        self.form.time = value.to_string();
        self.save_draft().await;
        true
    }

    /// One-second heartbeat.
    pub fn tick(&mut self) -> Option<HoldEvent> {
        self.hold.tick(&mut self.view)
    }

    pub async fn submit(&mut self) -> SubmissionOutcome {
        let ctx = SubmitContext {
            form: &mut self.form,
            hold: &mut self.hold,
            availability: &mut self.availability,
            drafts: &self.drafts,
            view: &mut self.view,
            location: &mut self.location,
            confirm: self.confirm.as_ref(),
        };
        self.submission.submit(ctx).await
    }

    /// Issues a fetch for the form's current date and service. Pair with
    /// [`BookingSession::apply_slot_fetch`] once it resolves.
    pub fn begin_slot_fetch(&mut self) -> SlotFetch {
        let query = AvailabilityQuery {
            date: self.form.date.clone(),
            service: self.form.service.clone(),
            token: self.hold.token().map(str::to_string),
        };
        self.availability.begin(query, &mut self.view)
    }

    pub fn apply_slot_fetch(&mut self, result: FetchResult) -> Applied {
        let applied = self.availability.apply(result, &mut self.view);
        if applied != Applied::Stale {
            self.reconcile_time();
        }
        applied
    }

    async fn refresh_slots(&mut self) -> Applied {
        let fetch = self.begin_slot_fetch();
        let result = fetch.run().await;
        self.apply_slot_fetch(result)
    }

    /// A re-rendered selector keeps its selection only if the slot survived.
    fn reconcile_time(&mut self) {
        let wanted = self
            .pending_time
            .take()
            .unwrap_or_else(|| std::mem::take(&mut self.form.time));
        if !wanted.is_empty() && self.availability.current().contains_value(&wanted) {
            self.form.time = wanted;
        } else {
            self.form.time.clear();
        }
    }

    async fn save_draft(&self) {
        let draft = self.form.to_draft(self.clock.now());
        self.drafts.save(&self.hold.draft_key(), &draft).await;
    }
}
