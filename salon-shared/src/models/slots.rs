use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// One bookable instant as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Raw ISO string; submitted back to the server unchanged.
    pub value: String,
    pub at: SlotTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTime {
    Instant(DateTime<Utc>),
    /// No offset on the wire: salon wall-clock time.
    Local(NaiveDateTime),
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

impl Slot {
    pub fn parse(raw: &str) -> Option<Self> {
        let at = match DateTime::parse_from_rfc3339(raw) {
            Ok(at) => SlotTime::Instant(at.with_timezone(&Utc)),
            Err(_) => NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(SlotTime::Local)?,
        };
        Some(Self {
            value: raw.to_string(),
            at,
        })
    }

    /// `HH:MM` in the salon's local offset.
    pub fn label(&self, offset: &FixedOffset) -> String {
        match self.at {
            SlotTime::Instant(at) => at.with_timezone(offset).format("%H:%M").to_string(),
            SlotTime::Local(at) => at.format("%H:%M").to_string(),
        }
    }
}

/// Ordered slots from the most recent availability answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSet {
    slots: Vec<Slot>,
}

impl SlotSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keeps server order; entries that are not ISO date-times are dropped.
    pub fn from_wire<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slots = raw
            .into_iter()
            .filter_map(|s| {
                let s = s.as_ref();
                let slot = Slot::parse(s);
                if slot.is_none() {
                    warn!("Dropping unparseable slot from server: {:?}", s);
                }
                slot
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.slots.iter().any(|s| s.value == value)
    }
}

/// Body of `GET availability`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub slots: Option<Vec<String>>,
}

impl AvailabilityResponse {
    pub fn into_slot_set(self) -> SlotSet {
        SlotSet::from_wire(self.slots.unwrap_or_default())
    }
}
