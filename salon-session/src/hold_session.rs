use crate::countdown::{Countdown, Tick, EXPIRED_LABEL};
use crate::draft_store::DraftStore;
use crate::location::Location;
use crate::view::{ErrorKind, FormView};
use salon_core::{BookingBackend, Clock};
use salon_shared::models::{BookingDraft, DraftKey, Hold};
use std::sync::Arc;
use tracing::{info, warn};

pub const OPEN_BOOKING: &str = "Open booking — no hold token. Use the chat link for a faster experience.";
pub const VALIDATING: &str = "Validating booking link…";
pub const INVALID_LINK: &str = "Booking link expired or invalid. Please request a new link from the chat.";
pub const HOLD_EXPIRED: &str = "Your hold has expired. Please request a new booking link.";

#[derive(Debug, Clone, PartialEq)]
pub enum HoldResolution {
    /// No token in the URL.
    Anonymous { draft: Option<BookingDraft> },
    Acquired { hold: Hold, draft: Option<BookingDraft> },
    /// Server refused the token. Final for this page load.
    InvalidLink,
    /// Token was valid but the hold ran out before it could be used.
    Lapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    Expired,
}

/// Owns the active hold and keeps the countdown and draft key in step with it.
pub struct HoldSession {
    backend: Arc<dyn BookingBackend>,
    drafts: DraftStore,
    clock: Arc<dyn Clock>,
    countdown: Countdown,
    hold: Option<Hold>,
}

impl HoldSession {
    pub fn new(backend: Arc<dyn BookingBackend>, drafts: DraftStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            drafts,
            clock,
            countdown: Countdown::new(),
            hold: None,
        }
    }

    pub fn hold(&self) -> Option<&Hold> {
        self.hold.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.hold.as_ref().map(|h| h.token.as_str())
    }

    pub fn draft_key(&self) -> DraftKey {
        DraftKey::for_token(self.token())
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub async fn resolve_from_url(&mut self, location: &mut Location, view: &mut FormView) -> HoldResolution {
        let token = match location.hold_token() {
            Some(token) => token,
            None => {
                view.status.set_status(OPEN_BOOKING);
                let draft = self.drafts.load(&DraftKey::Anonymous).await;
                return HoldResolution::Anonymous { draft };
            }
        };

        view.status.set_status(VALIDATING);
        let hold = match self.backend.lookup_hold(&token).await {
            Ok(body) => body.into_hold(&token),
            Err(e) => {
                warn!("Hold lookup failed: {}", e);
                None
            }
        };

        // The raw link should not survive in history either way
        location.strip_hold_token();

        let hold = match hold {
            Some(hold) => hold,
            None => {
                info!("Booking link rejected");
                view.show_error(ErrorKind::InvalidLink, INVALID_LINK);
                return HoldResolution::InvalidLink;
            }
        };

        self.hold = Some(hold.clone());
        info!("Hold acquired, expires at {}", hold.expires_at);

        let tick = self.countdown.start(hold.expires_at, self.clock.now());
        if self.render_tick(tick, view) == Some(HoldEvent::Expired) {
            return HoldResolution::Lapsed;
        }

        let draft = self.drafts.load(&self.draft_key()).await;
        HoldResolution::Acquired { hold, draft }
    }

    /// One-second heartbeat.
    pub fn tick(&mut self, view: &mut FormView) -> Option<HoldEvent> {
        let tick = self.countdown.tick(self.clock.now());
        self.render_tick(tick, view)
    }

    fn render_tick(&mut self, tick: Tick, view: &mut FormView) -> Option<HoldEvent> {
        match tick {
            Tick::Inactive => None,
            Tick::Remaining(_) => {
                view.hold_timer = self.countdown.display().to_string();
                None
            }
            Tick::JustExpired => {
                self.expire(view);
                Some(HoldEvent::Expired)
            }
        }
    }

    /// Countdown hit zero. The customer needs a fresh link; nothing retries.
    pub fn expire(&mut self, view: &mut FormView) {
        view.hold_timer = EXPIRED_LABEL.to_string();
        if self.hold.take().is_some() {
            info!("Hold expired");
            view.show_error(ErrorKind::HoldExpired, HOLD_EXPIRED);
        }
    }

    /// Server says the hold is gone (410 at submit). Messaging is the caller's.
    pub fn revoke(&mut self, view: &mut FormView) {
        self.countdown.mark_expired();
        view.hold_timer = EXPIRED_LABEL.to_string();
        if self.hold.take().is_some() {
            info!("Hold revoked by server");
        }
    }
}
