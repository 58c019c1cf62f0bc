use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const DRAFT_KEY_PREFIX: &str = "booking_draft_";
const ANONYMOUS_BUCKET: &str = "anon";

/// Snapshot of an in-progress booking form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub stylist: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub notes: String,
    pub saved_at: DateTime<Utc>,
}

/// Bucket a draft is filed under: the hold token, or the shared anonymous one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DraftKey {
    Anonymous,
    Token(String),
}

impl DraftKey {
    pub fn for_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if !t.is_empty() => DraftKey::Token(t.to_string()),
            _ => DraftKey::Anonymous,
        }
    }

    /// Key used in the backing storage.
    pub fn storage_key(&self) -> String {
        match self {
            DraftKey::Anonymous => format!("{}{}", DRAFT_KEY_PREFIX, ANONYMOUS_BUCKET),
            DraftKey::Token(token) => format!("{}{}", DRAFT_KEY_PREFIX, token),
        }
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftKey::Anonymous => write!(f, "anonymous"),
            // Tokens are bearer credentials; only a prefix goes to logs.
            DraftKey::Token(token) => {
                let shown: String = token.chars().take(4).collect();
                write!(f, "token:{}…", shown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(DraftKey::Anonymous.storage_key(), "booking_draft_anon");
        assert_eq!(DraftKey::for_token(Some("abc")).storage_key(), "booking_draft_abc");
        assert_eq!(DraftKey::for_token(Some("")), DraftKey::Anonymous);
        assert_eq!(DraftKey::for_token(None), DraftKey::Anonymous);
    }

    #[test]
    fn test_display_truncates_token() {
        let key = DraftKey::Token("secret-token".to_string());
        assert_eq!(key.to_string(), "token:secr…");
    }

    #[test]
    fn test_partial_record_defaults_missing_fields() {
        let raw = r#"{ "name": "Ana", "savedAt": "2024-05-01T09:00:00Z" }"#;
        let draft: BookingDraft = serde_json::from_str(raw).unwrap();
        assert_eq!(draft.name, "Ana");
        assert!(draft.time.is_empty());
    }
}
