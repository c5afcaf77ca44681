// 数据库模块
// 包含表结构引导与存储库实现

pub mod models;
pub mod repositories;

// 重新导出常用类型，方便其他模块使用
pub use models::clap::ClapEntity;
pub use repositories::claps::ClapRepository;
pub use repositories::rate_limit::RateLimitRepository;

use sqlx::PgPool;

/// 幂等建表。claps 按资源一行；rate_limits 按 (客户端, 资源, 窗口起点) 一行，
/// window_start 上的索引用于压缩任务的范围扫描。
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS claps (
            slug VARCHAR(200) PRIMARY KEY,
            count BIGINT NOT NULL DEFAULT 0,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rate_limits (
            client_token VARCHAR(64) NOT NULL,
            slug VARCHAR(200) NOT NULL,
            window_start BIGINT NOT NULL,
            count INTEGER NOT NULL DEFAULT 0,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (client_token, slug, window_start)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_rate_limits_window_start ON rate_limits (window_start)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
