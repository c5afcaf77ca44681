// 限流窗口存储库
// 准入判定是一条条件 upsert：合并后的计数超限时 WHERE 不成立，
// 整条语句不修改任何行，两个并发的临界请求不可能同时通过

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Error as SqlxError, PgPool};

use crate::claps::window;
use crate::storage::{Admission, RateLimitStore, StoreError};

/// 限流存储库，处理 rate_limits 表的全部数据库操作
pub struct RateLimitRepository {
    db: Arc<PgPool>,
    window_secs: u64,
    max_per_window: u32,
}

impl RateLimitRepository {
    pub fn new(db: Arc<PgPool>, window_secs: u64, max_per_window: u32) -> Self {
        Self {
            db,
            window_secs,
            max_per_window,
        }
    }

    /// 在单条语句内完成"检查并扣减"。
    /// 返回 Some(窗口累计) 表示写入生效；None 表示条件不成立，未修改任何行。
    /// 首次插入没有冲突分支可走，要求调用方保证 amount <= limit。
    pub async fn try_consume(
        &self,
        client_token: &str,
        slug: &str,
        window_start: i64,
        amount: i32,
        limit: i32,
    ) -> Result<Option<i32>, SqlxError> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO rate_limits (client_token, slug, window_start, count, updated_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (client_token, slug, window_start) DO UPDATE
            SET count = rate_limits.count + EXCLUDED.count, updated_at = now()
            WHERE rate_limits.count + EXCLUDED.count <= $5
            RETURNING count
            "#,
        )
        .bind(client_token)
        .bind(slug)
        .bind(window_start)
        .bind(amount)
        .bind(limit)
        .fetch_optional(self.db.as_ref())
        .await
    }

    /// 分批删除过期窗口记录，返回本批删除的行数。
    /// ctid 子查询限制单条语句的工作量，避免一次性大事务。
    pub async fn delete_expired_batch(
        &self,
        cutoff: i64,
        batch_size: i64,
    ) -> Result<u64, SqlxError> {
        let result = sqlx::query(
            r#"
            DELETE FROM rate_limits
            WHERE ctid IN (
                SELECT ctid FROM rate_limits WHERE window_start < $1 LIMIT $2
            )
            "#,
        )
        .bind(cutoff)
        .bind(batch_size)
        .execute(self.db.as_ref())
        .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RateLimitStore for RateLimitRepository {
    async fn try_admit(
        &self,
        client_token: &str,
        slug: &str,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<Admission, StoreError> {
        // 超过单窗上限的数量不可能通过条件写入，直接拒绝，
        // 同时保证首次插入路径满足 amount <= limit 的前提
        if amount > self.max_per_window {
            return Ok(Admission::Rejected);
        }

        let window_start = window::window_start(now.timestamp(), self.window_secs);
        match self
            .try_consume(
                client_token,
                slug,
                window_start,
                amount as i32,
                self.max_per_window as i32,
            )
            .await?
        {
            Some(count) => Ok(Admission::Accepted {
                window_count: count,
            }),
            None => Ok(Admission::Rejected),
        }
    }

    async fn delete_expired(&self, cutoff: i64, batch_size: i64) -> Result<u64, StoreError> {
        Ok(self.delete_expired_batch(cutoff, batch_size).await?)
    }
}
