// 点赞计数存储库
// 增量通过一条 INSERT ... ON CONFLICT DO UPDATE 合并，并发写入不会互相覆盖

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Error as SqlxError, PgPool};

use crate::database::models::clap::ClapEntity;
use crate::storage::{ClapStore, StoreError};

/// 点赞存储库，处理 claps 表的全部数据库操作
pub struct ClapRepository {
    db: Arc<PgPool>,
}

impl ClapRepository {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }

    /// 查询单个资源的计数行
    pub async fn get(&self, slug: &str) -> Result<Option<ClapEntity>, SqlxError> {
        sqlx::query_as::<_, ClapEntity>(
            "SELECT slug, count, updated_at FROM claps WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.db.as_ref())
        .await
    }

    /// 原子合并增量：行不存在则插入 count=by，存在则 count = count + by，
    /// 返回合并后的计数
    pub async fn add(&self, slug: &str, by: i64) -> Result<i64, SqlxError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO claps (slug, count, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (slug) DO UPDATE
            SET count = claps.count + EXCLUDED.count, updated_at = now()
            RETURNING count
            "#,
        )
        .bind(slug)
        .bind(by)
        .fetch_one(self.db.as_ref())
        .await
    }
}

#[async_trait]
impl ClapStore for ClapRepository {
    async fn read(&self, slug: &str) -> Result<i64, StoreError> {
        Ok(self.get(slug).await?.map(|row| row.count).unwrap_or(0))
    }

    async fn increment(&self, slug: &str, by: u32) -> Result<i64, StoreError> {
        Ok(self.add(slug, by as i64).await?)
    }
}
