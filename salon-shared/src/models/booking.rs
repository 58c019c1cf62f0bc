use crate::pii::Masked;
use serde::{Deserialize, Serialize};

/// Body of `POST booking`. Built at submit time, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingPayload {
    pub token: Option<String>,
    pub name: Masked<String>,
    pub phone: Masked<String>,
    pub email: Masked<String>,
    pub service: String,
    pub stylist: Option<String>,
    pub date: String,
    /// ISO instant taken from the selected slot.
    pub time: String,
    pub notes: String,
}

/// 200/201 answer to a booking.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: Option<String>,
    pub id: Option<String>,
    pub return_url: Option<String>,
}

impl BookingConfirmation {
    /// `booking_id`, else `id`, else empty.
    pub fn reference(&self) -> &str {
        self.booking_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.id.as_deref())
            .unwrap_or("")
    }
}

/// 409 answer: the requested slot went to someone else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConflictResponse {
    #[serde(default)]
    pub alternatives: Vec<String>,
}
