pub mod app_config;
pub mod drafts;
pub mod http_backend;
pub mod redis_repo;

pub use drafts::{build_draft_storage, FileDraftStorage, MemoryDraftStorage};
pub use http_backend::HttpBackend;
pub use redis_repo::RedisDraftStorage;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),
}
