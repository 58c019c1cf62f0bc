use async_trait::async_trait;
use redis::AsyncCommands;
use salon_core::DraftStorage;
use tracing::debug;

/// Drafts kept in Redis so a customer can resume from another device.
/// Entries expire after `ttl_seconds`.
#[derive(Clone)]
pub struct RedisDraftStorage {
    client: redis::Client,
    ttl_seconds: u64,
}

impl RedisDraftStorage {
    pub fn new(connection_string: &str, ttl_seconds: u64) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client, ttl_seconds })
    }
}

#[async_trait]
impl DraftStorage for RedisDraftStorage {
    async fn put(&self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(key, value, self.ttl_seconds).await?;
        debug!("Draft stored in redis with ttl {}s", self.ttl_seconds);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}
