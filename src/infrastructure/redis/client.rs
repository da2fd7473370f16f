use anyhow::Result;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use tracing::info;

use crate::workflow::context::CheckpointStore;

#[derive(Clone)]
pub struct RedisService {
    client: Client,
}

impl RedisService {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(connection_string)?;

        // Test connection
        let _conn = client.get_multiplexed_async_connection().await?;

        info!("✅ Connected to Redis");
        Ok(Self { client })
    }

    pub async fn get_conn(&self) -> Result<MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    /// Increments a counter and (re)arms its expiry, returning the new value.
    pub async fn incr_with_ttl(&self, key: &str, ttl_secs: u64) -> Result<u64> {
        let mut conn = self.get_conn().await?;
        let count: u64 = conn.incr(key, 1).await?;
        let _: () = conn.expire(key, ttl_secs as i64).await?;
        Ok(count)
    }
}

#[async_trait]
impl CheckpointStore for RedisService {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_conn().await?;
        let saved: Option<String> = conn.get(key).await?;
        Ok(saved)
    }

    async fn save(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }
}
