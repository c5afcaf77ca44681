// 窗口压缩
// 限流记录只在保留期内有意义，后台任务周期性把过期窗口按批删掉，
// 防止表无限增长。删除滞后不影响正确性，新窗口的记账总是从 0 开始

use chrono::Utc;

use crate::claps::window;
use crate::config::Config;
use crate::storage::{Storage, StoreError};

/// 执行一轮压缩：按批删除早于截止线的记录，返回删除总数。
/// 单批删除量不足一批说明已经删完
pub async fn compact_once(
    storage: &Storage,
    cutoff: i64,
    batch_size: i64,
) -> Result<u64, StoreError> {
    let batch_size = batch_size.max(1);
    let mut total = 0u64;
    loop {
        let deleted = storage
            .rate_limits
            .delete_expired(cutoff, batch_size)
            .await?;
        total += deleted;
        if deleted < batch_size as u64 {
            return Ok(total);
        }
    }
}

/// 后台压缩循环，随服务启动常驻运行。
/// interval 的第一跳立即触发，启动时先清一次历史数据；
/// 单轮失败只记日志，下一轮照常执行
pub async fn run_window_compactor(storage: Storage, config: Config) {
    let mut ticker = tokio::time::interval(config.compaction_interval());
    loop {
        ticker.tick().await;
        let cutoff = window::retention_cutoff(
            Utc::now().timestamp(),
            config.rate_limit_window_secs,
            config.retention_windows,
        );
        match compact_once(&storage, cutoff, config.compaction_batch_size).await {
            Ok(0) => {}
            Ok(deleted) => {
                tracing::info!("窗口压缩完成, 删除过期记录 {} 条", deleted);
            }
            Err(e) => {
                tracing::warn!("窗口压缩失败, 等待下一轮: {}", e);
            }
        }
    }
}
