use chrono::{DateTime, Utc};
use tracing::info;

pub const EXPIRED_LABEL: &str = "expired";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running { expires_at: DateTime<Utc> },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Idle or already expired; nothing changed.
    Inactive,
    Remaining(u64),
    /// Reported once, on the tick that reaches zero.
    JustExpired,
}

/// Hold countdown. Remaining time is recomputed from the clock on every tick
/// so a suspended tab catches up instead of drifting.
#[derive(Debug, Clone)]
pub struct Countdown {
    state: CountdownState,
    display: String,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: CountdownState::Idle,
            display: String::new(),
        }
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Replaces any running countdown and ticks once immediately.
    pub fn start(&mut self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Tick {
        if let CountdownState::Running { expires_at: previous } = self.state {
            info!("Countdown to {} superseded by {}", previous, expires_at);
        }
        self.state = CountdownState::Running { expires_at };
        self.tick(now)
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        let expires_at = match self.state {
            CountdownState::Running { expires_at } => expires_at,
            CountdownState::Idle | CountdownState::Expired => return Tick::Inactive,
        };

        let remaining = remaining_seconds(expires_at, now);
        if remaining == 0 {
            self.state = CountdownState::Expired;
            self.display = EXPIRED_LABEL.to_string();
            info!("Hold countdown reached zero");
            return Tick::JustExpired;
        }

        self.display = format_remaining(remaining);
        Tick::Remaining(remaining)
    }

    /// Moves straight to `Expired` without reporting `JustExpired`; used
    /// when the server has already declared the hold gone.
    pub fn mark_expired(&mut self) {
        self.state = CountdownState::Expired;
        self.display = EXPIRED_LABEL.to_string();
    }
}

/// Whole seconds left, floored at zero.
pub fn remaining_seconds(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (expires_at - now).num_seconds().max(0) as u64
}

pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_sixty_five_seconds_expires_once() {
        let mut countdown = Countdown::new();
        let mut now = t0();

        assert_eq!(countdown.start(now + Duration::seconds(65), now), Tick::Remaining(65));
        assert_eq!(countdown.display(), "01:05");

        let mut expirations = 0;
        for _ in 0..65 {
            now += Duration::seconds(1);
            if countdown.tick(now) == Tick::JustExpired {
                expirations += 1;
            }
        }
        assert_eq!(expirations, 1);
        assert_eq!(countdown.display(), "expired");
        assert_eq!(countdown.state(), CountdownState::Expired);

        // Further ticks stay quiet
        for _ in 0..5 {
            now += Duration::seconds(1);
            assert_eq!(countdown.tick(now), Tick::Inactive);
        }
    }

    #[test]
    fn test_recomputes_after_suspension() {
        let mut countdown = Countdown::new();
        countdown.start(t0() + Duration::seconds(600), t0());

        // Tab asleep for four minutes: one tick, not 240
        assert_eq!(countdown.tick(t0() + Duration::seconds(240)), Tick::Remaining(360));
        assert_eq!(countdown.display(), "06:00");
    }

    #[test]
    fn test_fractional_second_floors() {
        let mut countdown = Countdown::new();
        let expires = t0() + Duration::milliseconds(1500);
        assert_eq!(countdown.start(expires, t0()), Tick::Remaining(1));
        assert_eq!(countdown.tick(t0() + Duration::milliseconds(600)), Tick::JustExpired);
    }

    #[test]
    fn test_start_in_the_past_expires_immediately() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.start(t0() - Duration::seconds(5), t0()), Tick::JustExpired);
    }

    #[test]
    fn test_restart_supersedes_previous_run() {
        let mut countdown = Countdown::new();
        countdown.start(t0() + Duration::seconds(10), t0());
        countdown.start(t0() + Duration::seconds(300), t0());

        // The first deadline passing no longer matters
        assert_eq!(countdown.tick(t0() + Duration::seconds(11)), Tick::Remaining(289));
    }

    #[test]
    fn test_restart_after_expiry() {
        let mut countdown = Countdown::new();
        countdown.start(t0(), t0());
        assert_eq!(countdown.state(), CountdownState::Expired);

        assert_eq!(countdown.start(t0() + Duration::seconds(120), t0()), Tick::Remaining(120));
        assert_eq!(countdown.display(), "02:00");
    }

    #[test]
    fn test_idle_ticks_are_inactive() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.tick(t0()), Tick::Inactive);
        assert_eq!(countdown.display(), "");
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(59), "00:59");
        assert_eq!(format_remaining(900), "15:00");
        assert_eq!(format_remaining(6000), "100:00");
    }
}
