pub mod availability;
pub mod countdown;
pub mod draft_store;
pub mod form;
pub mod hold_session;
pub mod location;
pub mod session;
pub mod submission;
pub mod view;

#[cfg(test)]
mod testing;

pub use availability::{Applied, AvailabilityClient, FetchResult, SlotFetch};
pub use countdown::{Countdown, CountdownState, Tick};
pub use draft_store::DraftStore;
pub use form::{BookingForm, Field};
pub use hold_session::{HoldEvent, HoldResolution, HoldSession};
pub use location::Location;
pub use session::{BookingSession, SessionDeps, SessionError, SessionSettings, SessionStart};
pub use submission::{Blocked, Confirm, SubmissionController, SubmissionOutcome, SubmissionState};
pub use view::{ErrorKind, FormView, SlotOption, StatusChannel, SubmitControl, TimeSelector};
