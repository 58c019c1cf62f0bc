use async_trait::async_trait;
use salon_shared::models::{BookingPayload, HoldLookupResponse, SlotSet};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Parameters of one availability read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub date: String,
    pub service: String,
    pub token: Option<String>,
}

/// Which availability answer wins when fetches overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Answers to requests older than the last applied one are discarded.
    #[default]
    LatestIssued,
    /// Whatever arrives last is shown, even if it answers an older request.
    LastArrival,
}

/// Raw answer to a booking POST. The submission controller owns the meaning
/// of each status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: String,
}

/// The booking backend as seen from the form.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// `GET hold-lookup?t=<token>`. Non-2xx is `BackendError::Status`.
    async fn lookup_hold(&self, token: &str) -> Result<HoldLookupResponse, BackendError>;

    /// `GET availability`. Idempotent.
    async fn fetch_availability(&self, query: &AvailabilityQuery) -> Result<SlotSet, BackendError>;

    /// `POST booking`. Any HTTP status is `Ok`; only transport failures are `Err`.
    async fn submit_booking(&self, payload: &BookingPayload) -> Result<SubmitResponse, BackendError>;
}
