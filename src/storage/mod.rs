// 存储策略层
// 两种后端实现同一组接口：postgres 提供原子条件写入，redis 为尽力而为的降级实现

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;

use crate::cache::operations::claps::RedisClapStore;
use crate::cache::operations::rate_limit::RedisRateLimitStore;
use crate::config::{Config, StorageBackend};
use crate::database;
use crate::database::repositories::claps::ClapRepository;
use crate::database::repositories::rate_limit::RateLimitRepository;

/// 限流准入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// 已准入，附带该窗口内累计消费量
    Accepted { window_count: i32 },
    /// 超出窗口配额，本次请求未消费任何配额
    Rejected,
}

/// 存储层错误，统一包装两种后端的驱动错误
#[derive(Debug)]
pub enum StoreError {
    Postgres(sqlx::Error),
    Redis(redis::RedisError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Postgres(e) => write!(f, "postgres error: {}", e),
            StoreError::Redis(e) => write!(f, "redis error: {}", e),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Postgres(e)
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Redis(e)
    }
}

/// 计数存储。increment 必须是存储层的单次原子合并，
/// 调用方先读后写的累加方式在并发下会丢失增量，接口上不提供。
#[async_trait]
pub trait ClapStore: Send + Sync {
    /// 读取当前计数，资源不存在时返回 0
    async fn read(&self, slug: &str) -> Result<i64, StoreError>;

    /// 原子合并增量并返回合并后的总数
    async fn increment(&self, slug: &str, by: u32) -> Result<i64, StoreError>;
}

/// 限流存储。try_admit 在一次存储操作内完成"检查并记账"：
/// 合并后超出配额则整体拒绝且不留任何修改。
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn try_admit(
        &self,
        client_token: &str,
        slug: &str,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<Admission, StoreError>;

    /// 删除一批窗口起点早于 cutoff 的记录，返回删除数量。
    /// 依赖 TTL 自动过期的后端返回 0。
    async fn delete_expired(&self, cutoff: i64, batch_size: i64) -> Result<u64, StoreError>;
}

/// 按配置装配好的一对存储句柄
#[derive(Clone)]
pub struct Storage {
    pub claps: Arc<dyn ClapStore>,
    pub rate_limits: Arc<dyn RateLimitStore>,
}

impl Storage {
    /// 连接选定的后端并完成初始化
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        match config.storage_backend {
            StorageBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .after_connect(|conn, _meta| {
                        Box::pin(async move {
                            conn.execute("SET application_name = 'claps_backend';")
                                .await?;
                            Ok(())
                        })
                    })
                    .connect(&config.database_url)
                    .await?;
                database::ensure_schema(&pool).await?;

                let pool = Arc::new(pool);
                tracing::info!("storage backend: postgres (atomic conditional upsert)");
                Ok(Storage {
                    claps: Arc::new(ClapRepository::new(pool.clone())),
                    rate_limits: Arc::new(RateLimitRepository::new(
                        pool,
                        config.rate_limit_window_secs,
                        config.rate_limit_max_claps,
                    )),
                })
            }
            StorageBackend::Redis => {
                let client = Arc::new(redis::Client::open(config.redis_url.clone())?);
                // 该后端没有跨读写的条件原子性，准入检查退化为尽力而为
                tracing::warn!(
                    "storage backend: redis (best-effort admission, no conditional atomicity)"
                );
                Ok(Storage {
                    claps: Arc::new(RedisClapStore::new(client.clone())),
                    rate_limits: Arc::new(RedisRateLimitStore::new(
                        client,
                        config.rate_limit_window_secs,
                        config.rate_limit_max_claps,
                        config.retention_secs(),
                    )),
                })
            }
        }
    }
}
