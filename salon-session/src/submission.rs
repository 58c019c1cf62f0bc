use crate::availability::AvailabilityClient;
use crate::draft_store::DraftStore;
use crate::form::{BookingForm, Field};
use crate::hold_session::HoldSession;
use crate::location::Location;
use crate::view::{ErrorKind, FormView};
use async_trait::async_trait;
use salon_core::calendar;
use salon_core::{BookingBackend, CoreError, SubmitResponse};
use salon_shared::models::{BookingConfirmation, ConflictResponse, SlotSet};
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

pub const INCOMPLETE: &str = "Please complete all required fields correctly.";
pub const CLOSED_DAY: &str = "We are closed on Mondays. Please choose another date.";
pub const INVALID_DATE: &str = "Please choose a valid date.";
pub const NO_HOLD_WARNING: &str =
    "You do not have a reservation hold. Submitting may fail if another customer books the same time. Proceed?";
pub const SUBMITTING_LABEL: &str = "Securing your booking…";
pub const SUBMITTING_STATUS: &str = "Attempting to book — please wait";
pub const ALREADY_BOOKED: &str = "This booking is already confirmed.";
pub const CONFLICT: &str = "Selected time is no longer available. Suggested alternatives provided.";
pub const HOLD_GONE: &str = "Your hold token expired. Please request a new booking link from the chat.";
pub const FAILED: &str = "Booking failed. Please try again.";
pub const NETWORK: &str = "Network error while booking. Try again.";

/// Asks the customer a yes/no question (the browser's `confirm()`).
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    /// Terminal: the page has navigated away.
    Succeeded,
}

/// Why nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked {
    InvalidFields(Vec<Field>),
    ClosedDay,
    InvalidDate,
    /// Customer declined to book without a hold.
    Declined,
    AlreadyBooked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Blocked(Blocked),
    Succeeded { booking_id: String, redirect: Url },
    Conflict { alternatives: usize },
    Expired,
    /// `status` is `None` for transport failures.
    Failed { status: Option<u16> },
}

/// Everything a submission reads or changes besides the controller itself.
pub struct SubmitContext<'a> {
    pub form: &'a mut BookingForm,
    pub hold: &'a mut HoldSession,
    pub availability: &'a mut AvailabilityClient,
    pub drafts: &'a DraftStore,
    pub view: &'a mut FormView,
    pub location: &'a mut Location,
    pub confirm: &'a dyn Confirm,
}

pub struct SubmissionController {
    backend: Arc<dyn BookingBackend>,
    confirmation_base: Url,
    state: SubmissionState,
}

impl SubmissionController {
    pub fn new(backend: Arc<dyn BookingBackend>, confirmation_base: Url) -> Self {
        Self {
            backend,
            confirmation_base,
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub async fn submit(&mut self, mut ctx: SubmitContext<'_>) -> SubmissionOutcome {
        if self.state == SubmissionState::Succeeded {
            ctx.view.status.set_status(ALREADY_BOOKED);
            return SubmissionOutcome::Blocked(Blocked::AlreadyBooked);
        }
        ctx.view.status.clear_error();

        if let Some(blocked) = Self::gate(&mut ctx).await {
            return SubmissionOutcome::Blocked(blocked);
        }

        // 1. Lock the form
        self.state = SubmissionState::Submitting;
        ctx.view.submit.set_busy();
        ctx.view.submit.label = SUBMITTING_LABEL.to_string();
        ctx.view.status.set_status(SUBMITTING_STATUS);

        // 2. Send
        let payload = ctx.form.to_payload(ctx.hold.token());
        info!(
            held = payload.token.is_some(),
            service = %payload.service,
            date = %payload.date,
            "Submitting booking for {:?}",
            payload.name
        );

        // 3. Interpret
        let outcome = match self.backend.submit_booking(&payload).await {
            Ok(response) => self.interpret(response, &mut ctx).await,
            Err(e) => {
                warn!("Booking request failed: {}", e);
                ctx.view.show_error(ErrorKind::SubmissionFailed, NETWORK);
                SubmissionOutcome::Failed { status: None }
            }
        };

        if self.state != SubmissionState::Succeeded {
            self.state = SubmissionState::Idle;
            ctx.view.submit.restore();
        }
        outcome
    }

    /// Client-side checks; nothing here touches the network.
    async fn gate(ctx: &mut SubmitContext<'_>) -> Option<Blocked> {
        if let Err(CoreError::ClosedDay(_)) = calendar::ensure_business_day(&ctx.form.date) {
            ctx.form.date.clear();
            ctx.form.time.clear();
            ctx.availability.clear(ctx.view);
            ctx.view.show_error(ErrorKind::Validation, CLOSED_DAY);
            return Some(Blocked::ClosedDay);
        }

        let invalid = ctx.form.invalid_fields();
        if !invalid.is_empty() {
            ctx.view.show_error(ErrorKind::Validation, INCOMPLETE);
            return Some(Blocked::InvalidFields(invalid));
        }

        if calendar::parse_booking_date(&ctx.form.date).is_err() {
            ctx.view.show_error(ErrorKind::Validation, INVALID_DATE);
            return Some(Blocked::InvalidDate);
        }

        if ctx.hold.hold().is_none() && !ctx.confirm.confirm(NO_HOLD_WARNING).await {
            info!("Customer declined to book without a hold");
            return Some(Blocked::Declined);
        }

        None
    }

    async fn interpret(&mut self, response: SubmitResponse, ctx: &mut SubmitContext<'_>) -> SubmissionOutcome {
        match response.status {
            200 | 201 => match serde_json::from_str::<BookingConfirmation>(&response.body) {
                Ok(confirmation) => {
                    ctx.drafts.clear(&ctx.hold.draft_key()).await;

                    let booking_id = confirmation.reference().to_string();
                    let redirect = confirmation_url(
                        &self.confirmation_base,
                        &booking_id,
                        confirmation.return_url.as_deref(),
                    );
                    info!("Booking {} confirmed", booking_id);
                    ctx.location.navigate(redirect.clone());
                    self.state = SubmissionState::Succeeded;
                    SubmissionOutcome::Succeeded { booking_id, redirect }
                }
                Err(e) => {
                    error!(
                        "Booking accepted with status {} but body unreadable ({}): {}",
                        response.status, e, response.body
                    );
                    ctx.view.show_error(ErrorKind::SubmissionFailed, FAILED);
                    SubmissionOutcome::Failed {
                        status: Some(response.status),
                    }
                }
            },
            409 => {
                let alternatives = serde_json::from_str::<ConflictResponse>(&response.body)
                    .map(|c| c.alternatives)
                    .unwrap_or_else(|e| {
                        warn!("Conflict body unreadable ({}): {}", e, response.body);
                        Vec::new()
                    });
                let slots = SlotSet::from_wire(alternatives);
                let count = slots.len();
                info!("Slot taken; {} alternatives offered", count);

                ctx.view.show_error(ErrorKind::SubmissionConflict, CONFLICT);
                ctx.form.time.clear();
                ctx.availability.replace(slots, ctx.view);
                SubmissionOutcome::Conflict { alternatives: count }
            }
            410 => {
                ctx.view.show_error(ErrorKind::HoldExpired, HOLD_GONE);
                ctx.hold.revoke(ctx.view);
                SubmissionOutcome::Expired
            }
            status => {
                warn!("Booking failed with status {}: {}", status, response.body);
                ctx.view.show_error(ErrorKind::SubmissionFailed, FAILED);
                SubmissionOutcome::Failed { status: Some(status) }
            }
        }
    }
}

/// `<base>?id=<booking id>[&return=<url>]`
pub fn confirmation_url(base: &Url, booking_id: &str, return_url: Option<&str>) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("id", booking_id);
        if let Some(ret) = return_url.filter(|r| !r.is_empty()) {
            query.append_pair("return", ret);
        }
    }
    url
}
