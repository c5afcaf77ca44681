use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 点赞计数数据库实体
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ClapEntity {
    pub slug: String,
    pub count: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
