use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-issued temporary reservation. Replaced wholesale, never edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hold {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub prefill: Prefill,
}

/// Customer details the chat flow already collected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prefill {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
}

/// Body of `GET hold-lookup?t=<token>`.
#[derive(Debug, Clone, Deserialize)]
pub struct HoldLookupResponse {
    #[serde(default)]
    pub valid: bool,
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub prefill: Option<Prefill>,
}

impl HoldLookupResponse {
    /// Builds the hold if the server vouched for the token.
    ///
    /// A "valid" answer without an expiry is not usable: the countdown has
    /// nothing to run against.
    pub fn into_hold(self, requested_token: &str) -> Option<Hold> {
        if !self.valid {
            return None;
        }
        let expires_at = self.expires_at?;
        let token = self
            .token
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| requested_token.to_string());

        Some(Hold {
            token,
            expires_at,
            prefill: self.prefill.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_valid_lookup_builds_hold() {
        let body = r#"{
            "valid": true,
            "token": "tok-1",
            "expires_at": "2024-05-01T10:15:00Z",
            "prefill": { "name": "Ana", "service": "cut" }
        }"#;
        let lookup: HoldLookupResponse = serde_json::from_str(body).unwrap();
        let hold = lookup.into_hold("tok-1").unwrap();

        assert_eq!(hold.token, "tok-1");
        assert_eq!(hold.expires_at, Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 0).unwrap());
        assert_eq!(hold.prefill.name.as_deref(), Some("Ana"));
        assert_eq!(hold.prefill.phone, None);
    }

    #[test]
    fn test_invalid_or_incomplete_lookup_is_rejected() {
        let invalid: HoldLookupResponse =
            serde_json::from_str(r#"{ "valid": false, "expires_at": "2024-05-01T10:15:00Z" }"#).unwrap();
        assert!(invalid.into_hold("tok").is_none());

        let no_expiry: HoldLookupResponse = serde_json::from_str(r#"{ "valid": true }"#).unwrap();
        assert!(no_expiry.into_hold("tok").is_none());
    }

    #[test]
    fn test_missing_token_falls_back_to_requested() {
        let lookup: HoldLookupResponse =
            serde_json::from_str(r#"{ "valid": true, "expires_at": "2024-05-01T10:15:00Z" }"#).unwrap();
        assert_eq!(lookup.into_hold("from-url").unwrap().token, "from-url");
    }
}
