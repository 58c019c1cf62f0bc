pub mod commands;
pub mod prompt;

use anyhow::{anyhow, Context};
use chrono::FixedOffset;
use salon_core::SystemClock;
use salon_session::{BookingSession, Confirm, Location, SessionDeps, SessionSettings};
use salon_store::app_config::{Config, SessionConfig};
use salon_store::{build_draft_storage, HttpBackend};
use std::sync::Arc;

pub fn session_settings(config: &SessionConfig) -> anyhow::Result<SessionSettings> {
    let display_offset = FixedOffset::east_opt(config.utc_offset_minutes * 60)
        .ok_or_else(|| anyhow!("session.utc_offset_minutes out of range: {}", config.utc_offset_minutes))?;

    Ok(SessionSettings {
        confirmation_path: config.confirmation_path.clone(),
        display_offset,
        ordering: config.availability_ordering,
    })
}

/// Wires the configured backend and draft storage into a session for `link`.
pub fn build_session(config: &Config, link: &str, confirm: Box<dyn Confirm>) -> anyhow::Result<BookingSession> {
    let backend = HttpBackend::new(&config.backend).context("Failed to create booking backend")?;
    let storage = build_draft_storage(&config.drafts).context("Failed to create draft storage")?;
    let location = Location::parse(link).with_context(|| format!("Invalid booking link {}", link))?;

    let session = BookingSession::new(
        SessionDeps {
            backend: Arc::new(backend),
            storage,
            clock: Arc::new(SystemClock),
            confirm,
        },
        session_settings(&config.session)?,
        location,
    )?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use salon_core::ResponseOrdering;

    #[test]
    fn test_session_settings_offset() {
        let config = SessionConfig {
            utc_offset_minutes: 90,
            availability_ordering: ResponseOrdering::LastArrival,
            ..Default::default()
        };
        let settings = session_settings(&config).unwrap();
        assert_eq!(settings.display_offset.local_minus_utc(), 5400);
        assert_eq!(settings.ordering, ResponseOrdering::LastArrival);
        assert_eq!(settings.confirmation_path, "thanks.html");
    }

    #[test]
    fn test_session_settings_rejects_absurd_offset() {
        let config = SessionConfig {
            utc_offset_minutes: 24 * 60,
            ..Default::default()
        };
        assert!(session_settings(&config).is_err());
    }
}
