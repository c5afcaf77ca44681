use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::clap_keys::clap_count_key;
use crate::storage::{ClapStore, StoreError};

/// 点赞计数缓存操作
pub struct ClapCacheOperations;

impl ClapCacheOperations {
    /// 读取计数，键不存在视为 0
    pub async fn get_count(
        redis: &Arc<RedisClient>,
        slug: &str,
    ) -> Result<i64, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let count: Option<i64> = conn.get(clap_count_key(slug)).await?;
        Ok(count.unwrap_or(0))
    }

    /// 以 INCRBY 合并增量并返回合并后的值。
    /// INCRBY 在服务端是单命令原子操作，并发增量不会丢失
    pub async fn increment_count(
        redis: &Arc<RedisClient>,
        slug: &str,
        by: i64,
    ) -> Result<i64, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let count: i64 = conn.incr(clap_count_key(slug), by).await?;
        Ok(count)
    }
}

/// ClapStore 的 Redis 实现
pub struct RedisClapStore {
    redis: Arc<RedisClient>,
}

impl RedisClapStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl ClapStore for RedisClapStore {
    async fn read(&self, slug: &str) -> Result<i64, StoreError> {
        Ok(ClapCacheOperations::get_count(&self.redis, slug).await?)
    }

    async fn increment(&self, slug: &str, by: u32) -> Result<i64, StoreError> {
        Ok(ClapCacheOperations::increment_count(&self.redis, slug, by as i64).await?)
    }
}
