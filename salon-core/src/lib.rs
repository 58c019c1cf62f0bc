pub mod backend;
pub mod calendar;
pub mod clock;
pub mod repository;

pub use backend::{AvailabilityQuery, BackendError, BookingBackend, ResponseOrdering, SubmitResponse};
pub use clock::{Clock, ManualClock, SystemClock};
pub use repository::DraftStorage;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid booking date: {0}")]
    InvalidDate(String),
    #[error("Closed on {0}")]
    ClosedDay(chrono::Weekday),
}

pub type CoreResult<T> = Result<T, CoreError>;
