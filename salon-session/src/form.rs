use chrono::{DateTime, Utc};
use salon_shared::models::{BookingDraft, BookingPayload, Prefill};
use salon_shared::Masked;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Email,
    Service,
    Stylist,
    Date,
    Time,
    Notes,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Phone,
        Field::Email,
        Field::Service,
        Field::Stylist,
        Field::Date,
        Field::Time,
        Field::Notes,
    ];

    pub fn is_required(self) -> bool {
        !matches!(self, Field::Stylist | Field::Notes)
    }

    pub fn parse(name: &str) -> Option<Self> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Service => "service",
            Field::Stylist => "stylist",
            Field::Date => "date",
            Field::Time => "time",
            Field::Notes => "notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live values of the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub stylist: String,
    pub date: String,
    /// Raw ISO value of the selected slot, empty when nothing is selected.
    pub time: String,
    pub notes: String,
}

impl BookingForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Service => &self.service,
            Field::Stylist => &self.stylist,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Phone => self.phone = value,
            Field::Email => self.email = value,
            Field::Service => self.service = value,
            Field::Stylist => self.stylist = value,
            Field::Date => self.date = value,
            Field::Time => self.time = value,
            Field::Notes => self.notes = value,
        }
    }

    /// Fields that would fail the browser's own constraint checks: required
    /// but blank, or an email without a local part and domain.
    pub fn invalid_fields(&self) -> Vec<Field> {
        let mut invalid: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).trim().is_empty())
            .collect();

        if !self.email.trim().is_empty() && !looks_like_email(self.email.trim()) {
            invalid.push(Field::Email);
        }
        invalid
    }

    pub fn apply_prefill(&mut self, prefill: &Prefill) {
        let pairs = [
            (Field::Name, &prefill.name),
            (Field::Phone, &prefill.phone),
            (Field::Email, &prefill.email),
            (Field::Service, &prefill.service),
        ];
        for (field, value) in pairs {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                self.set(field, v);
            }
        }
    }

    /// Copies every non-empty drafted value over the form.
    pub fn apply_draft(&mut self, draft: &BookingDraft) {
        let pairs = [
            (Field::Name, &draft.name),
            (Field::Phone, &draft.phone),
            (Field::Email, &draft.email),
            (Field::Service, &draft.service),
            (Field::Stylist, &draft.stylist),
            (Field::Date, &draft.date),
            (Field::Time, &draft.time),
            (Field::Notes, &draft.notes),
        ];
        for (field, value) in pairs {
            if !value.is_empty() {
                self.set(field, value.as_str());
            }
        }
    }

    pub fn to_draft(&self, saved_at: DateTime<Utc>) -> BookingDraft {
        BookingDraft {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            service: self.service.clone(),
            stylist: self.stylist.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            notes: self.notes.clone(),
            saved_at,
        }
    }

    pub fn to_payload(&self, token: Option<&str>) -> BookingPayload {
        BookingPayload {
            token: token.map(str::to_string),
            name: Masked(self.name.trim().to_string()),
            phone: Masked(self.phone.trim().to_string()),
            email: Masked(self.email.trim().to_string()),
            service: self.service.clone(),
            stylist: Some(self.stylist.clone()).filter(|s| !s.is_empty()),
            date: self.date.clone(),
            time: self.time.clone(),
            notes: self.notes.clone(),
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled() -> BookingForm {
        BookingForm {
            name: " Ana ".to_string(),
            phone: "0700 900".to_string(),
            email: "ana@example.com ".to_string(),
            service: "cut".to_string(),
            stylist: String::new(),
            date: "2024-05-01".to_string(),
            time: "2024-05-01T10:00:00Z".to_string(),
            notes: "fringe only".to_string(),
        }
    }

    #[test]
    fn test_invalid_fields() {
        assert!(filled().invalid_fields().is_empty());

        let mut form = filled();
        form.phone = "   ".to_string();
        form.time.clear();
        assert_eq!(form.invalid_fields(), vec![Field::Phone, Field::Time]);

        let mut form = filled();
        form.email = "ana.example.com".to_string();
        assert_eq!(form.invalid_fields(), vec![Field::Email]);
    }

    #[test]
    fn test_payload_trims_and_nulls_stylist() {
        let payload = filled().to_payload(Some("tok"));
        assert_eq!(payload.token.as_deref(), Some("tok"));
        assert_eq!(payload.name.expose(), "Ana");
        assert_eq!(payload.email.expose(), "ana@example.com");
        assert_eq!(payload.stylist, None);

        let mut form = filled();
        form.stylist = "Jo".to_string();
        assert_eq!(form.to_payload(None).stylist.as_deref(), Some("Jo"));
    }

    #[test]
    fn test_draft_overrides_prefill_only_where_set() {
        let mut form = BookingForm::default();
        form.apply_prefill(&Prefill {
            name: Some("Prefilled".to_string()),
            phone: Some("111".to_string()),
            email: None,
            service: Some("colour".to_string()),
        });

        let saved_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut draft = BookingForm::default().to_draft(saved_at);
        draft.name = "Drafted".to_string();
        form.apply_draft(&draft);

        assert_eq!(form.name, "Drafted");
        assert_eq!(form.phone, "111");
        assert_eq!(form.service, "colour");
    }

    #[test]
    fn test_field_parse() {
        assert_eq!(Field::parse("Email"), Some(Field::Email));
        assert_eq!(Field::parse("colour"), None);
    }
}
