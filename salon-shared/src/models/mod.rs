pub mod booking;
pub mod draft;
pub mod hold;
pub mod slots;

pub use booking::{BookingConfirmation, BookingPayload, ConflictResponse};
pub use draft::{BookingDraft, DraftKey};
pub use hold::{Hold, HoldLookupResponse, Prefill};
pub use slots::{AvailabilityResponse, Slot, SlotSet, SlotTime};
