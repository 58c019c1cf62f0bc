use salon_core::ResponseOrdering;
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub drafts: DraftConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_hold_path")]
    pub hold_path: String,
    #[serde(default = "default_availability_path")]
    pub availability_path: String,
    #[serde(default = "default_booking_path")]
    pub booking_path: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_hold_path() -> String { "/api/hold".to_string() }
fn default_availability_path() -> String { "/api/availability".to_string() }
fn default_booking_path() -> String { "/api/book".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DraftBackend {
    Memory,
    File,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DraftConfig {
    pub backend: DraftBackend,
    pub directory: Option<String>,
    pub redis_url: Option<String>,
    #[serde(default = "default_draft_ttl")]
    pub ttl_seconds: u64,
}

fn default_draft_ttl() -> u64 { 7 * 24 * 3600 }

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Resolved against the booking page URL.
    #[serde(default = "default_confirmation_path")]
    pub confirmation_path: String,
    /// Offset used to label slots, in minutes east of UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub availability_ordering: ResponseOrdering,
}

fn default_confirmation_path() -> String { "thanks.html".to_string() }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            confirmation_path: default_confirmation_path(),
            utc_offset_minutes: 0,
            availability_ordering: ResponseOrdering::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::from(dir.join("default")))
            // Per-environment and local overrides are optional
            .add_source(config::File::from(dir.join(&run_mode)).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            // Eg.. `SALON_BACKEND__BASE_URL=https://...`
            .add_source(config::Environment::with_prefix("SALON").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
