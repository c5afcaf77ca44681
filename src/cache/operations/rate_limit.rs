use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client as RedisClient};

use crate::cache::keys::clap_keys::rate_limit_key;
use crate::cache::models::rate_limit::CachedRateLimit;
use crate::claps::window;
use crate::storage::{Admission, RateLimitStore, StoreError};

/// 限流窗口缓存操作
pub struct RateLimitCacheOperations;

impl RateLimitCacheOperations {
    /// 读取窗口记录
    pub async fn get_window(
        redis: &Arc<RedisClient>,
        key: &str,
    ) -> Result<Option<CachedRateLimit>, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let result: Option<String> = conn.get(key).await?;

        match result {
            Some(json) => {
                let record = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "反序列化错误",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// 写入窗口记录并设置过期时间，到期后由 Redis 自行回收
    pub async fn set_window(
        redis: &Arc<RedisClient>,
        key: &str,
        record: &CachedRateLimit,
        ttl: u64,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let json = serde_json::to_string(record).map_err(|e| {
            redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
        })?;

        let _: () = conn.set_ex(key, json, ttl).await?;

        Ok(())
    }
}

/// 合并决策：给定现有记录与本次请求，返回应写入的新记录，
/// 超出配额时返回 None 表示拒绝且不写入。
/// 纯函数，准入的判定逻辑集中在这里
pub fn merge_window_record(
    existing: Option<CachedRateLimit>,
    window_start: i64,
    amount: u32,
    limit: u32,
    now_ts: i64,
) -> Option<CachedRateLimit> {
    let prior = match existing {
        // 键里编入了窗口起点，不同窗口不会撞键；起点不符视为陈旧记录丢弃
        Some(record) if record.window_start == window_start => record.count,
        _ => 0,
    };
    let merged = prior.checked_add(amount)?;
    if merged > limit {
        return None;
    }
    Some(CachedRateLimit {
        window_start,
        count: merged,
        updated_at: now_ts,
    })
}

/// RateLimitStore 的 Redis 实现。
/// Redis 不提供跨读写的条件原子性，准入退化为读-改-写：
/// 同一客户端的并发请求可能越过配额或互相覆盖计数，仅作降级方案使用
pub struct RedisRateLimitStore {
    redis: Arc<RedisClient>,
    window_secs: u64,
    max_per_window: u32,
    retention_secs: u64,
}

impl RedisRateLimitStore {
    pub fn new(
        redis: Arc<RedisClient>,
        window_secs: u64,
        max_per_window: u32,
        retention_secs: u64,
    ) -> Self {
        Self {
            redis,
            window_secs,
            max_per_window,
            retention_secs,
        }
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn try_admit(
        &self,
        client_token: &str,
        slug: &str,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<Admission, StoreError> {
        let now_ts = now.timestamp();
        let window_start = window::window_start(now_ts, self.window_secs);
        let key = rate_limit_key(client_token, slug, window_start);

        let existing = RateLimitCacheOperations::get_window(&self.redis, &key).await?;
        match merge_window_record(existing, window_start, amount, self.max_per_window, now_ts) {
            Some(record) => {
                let window_count = record.count as i32;
                RateLimitCacheOperations::set_window(
                    &self.redis,
                    &key,
                    &record,
                    self.retention_secs.max(1),
                )
                .await?;
                Ok(Admission::Accepted { window_count })
            }
            None => Ok(Admission::Rejected),
        }
    }

    async fn delete_expired(&self, _cutoff: i64, _batch_size: i64) -> Result<u64, StoreError> {
        // 记录写入时已带 TTL，过期回收由 Redis 完成
        Ok(0)
    }
}
