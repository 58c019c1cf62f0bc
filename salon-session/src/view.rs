use chrono::FixedOffset;
use salon_shared::models::SlotSet;
use tracing::{debug, warn};

pub const DEFAULT_SUBMIT_LABEL: &str = "Confirm booking";
const CHOOSE_TIME: &str = "Choose a time";
const NO_TIMES: &str = "No available times";

/// What went wrong, as far as the customer is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidLink,
    HoldExpired,
    AvailabilityFetchFailed,
    SubmissionConflict,
    SubmissionFailed,
    /// Form input the customer has to fix before anything is sent.
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOption {
    /// Empty for the "no selection" entries.
    pub value: String,
    pub label: String,
}

impl SlotOption {
    fn sentinel(label: &str) -> Self {
        Self {
            value: String::new(),
            label: label.to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.value.is_empty()
    }
}

/// Options of the time `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSelector {
    options: Vec<SlotOption>,
}

impl Default for TimeSelector {
    fn default() -> Self {
        Self {
            options: vec![SlotOption::sentinel(CHOOSE_TIME)],
        }
    }
}

impl TimeSelector {
    pub fn render(&mut self, slots: &SlotSet, offset: &FixedOffset) {
        self.options = vec![SlotOption::sentinel(CHOOSE_TIME)];
        if slots.is_empty() {
            self.options.push(SlotOption::sentinel(NO_TIMES));
            return;
        }
        self.options.extend(slots.iter().map(|slot| SlotOption {
            value: slot.value.clone(),
            label: slot.label(offset),
        }));
    }

    pub fn options(&self) -> &[SlotOption] {
        &self.options
    }

    pub fn real_options(&self) -> impl Iterator<Item = &SlotOption> {
        self.options.iter().filter(|o| !o.is_sentinel())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub busy: bool,
    pub label: String,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            enabled: true,
            busy: false,
            label: DEFAULT_SUBMIT_LABEL.to_string(),
        }
    }
}

impl SubmitControl {
    /// Disabled with the spinner showing.
    pub fn set_busy(&mut self) {
        self.enabled = false;
        self.busy = true;
    }

    pub fn set_ready(&mut self) {
        self.enabled = true;
        self.busy = false;
    }

    pub fn restore(&mut self) {
        self.set_ready();
        self.label = DEFAULT_SUBMIT_LABEL.to_string();
    }
}

/// The page's single status/error region. Every message is also queued for
/// the screen-reader live region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusChannel {
    status: String,
    error: Option<(ErrorKind, String)>,
    announcements: Vec<String>,
}

impl StatusChannel {
    pub fn set_status(&mut self, message: &str) {
        debug!("status: {}", message);
        self.status = message.to_string();
        if !message.is_empty() {
            self.announcements.push(message.to_string());
        }
    }

    pub fn set_error(&mut self, kind: ErrorKind, message: &str) {
        warn!("{:?}: {}", kind, message);
        self.error = Some((kind, message.to_string()));
        self.set_status(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.status.clear();
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_ref().map(|(_, m)| m.as_str())
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|(k, _)| *k)
    }

    pub fn announcements(&self) -> &[String] {
        &self.announcements
    }
}

/// Everything the page shows that the session controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormView {
    pub time: TimeSelector,
    pub submit: SubmitControl,
    pub hold_timer: String,
    pub status: StatusChannel,
}

impl FormView {
    /// Shows an error and hands the submit button back to the customer.
    pub fn show_error(&mut self, kind: ErrorKind, message: &str) {
        self.status.set_error(kind, message);
        self.submit.set_ready();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_set_renders_sentinels_only() {
        let mut selector = TimeSelector::default();
        selector.render(&SlotSet::empty(), &FixedOffset::east_opt(0).unwrap());

        let labels: Vec<&str> = selector.options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Choose a time", "No available times"]);
        assert_eq!(selector.real_options().count(), 0);
    }

    #[test]
    fn test_render_replaces_previous_options() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut selector = TimeSelector::default();
        selector.render(&SlotSet::from_wire(["2024-05-01T09:00:00Z", "2024-05-01T09:30:00Z"]), &utc);
        selector.render(&SlotSet::from_wire(["2024-05-01T14:00:00Z"]), &utc);

        let real: Vec<&str> = selector.real_options().map(|o| o.label.as_str()).collect();
        assert_eq!(real, vec!["14:00"]);
    }

    #[test]
    fn test_show_error_reenables_submit() {
        let mut view = FormView::default();
        view.submit.set_busy();
        view.show_error(ErrorKind::SubmissionFailed, "Booking failed. Please try again.");

        assert!(view.submit.enabled);
        assert!(!view.submit.busy);
        assert_eq!(view.status.error_kind(), Some(ErrorKind::SubmissionFailed));
        assert_eq!(view.status.status(), "Booking failed. Please try again.");
        assert_eq!(view.status.announcements().len(), 1);
    }
}
