// 记账协调器
// 串起身份散列、去抖、限流准入与全局计数合并，
// 任何拒绝路径都不触碰全局计数

use chrono::{DateTime, Utc};

use crate::claps::debounce::DebounceCache;
use crate::claps::identity;
use crate::config::Config;
use crate::error::AppError;
use crate::storage::{Admission, Storage};

/// 单次点赞请求的业务结果。
/// 限流与去抖是正常结果而不是错误，与存储故障严格区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClapOutcome {
    /// 已准入并计入全局计数
    Accepted {
        /// 合并后的全局计数
        count: i64,
        /// 实际计入的数量（收敛之后）
        applied: u32,
    },
    /// 该客户端在当前窗口的配额已耗尽
    RateLimited,
    /// 去抖窗口内的重复提交
    TooFast,
}

/// 点赞服务：所有读写请求的唯一入口
pub struct ClapService {
    storage: Storage,
    debounce: DebounceCache,
    salt: String,
    max_per_request: u32,
}

impl ClapService {
    pub fn new(storage: Storage, config: &Config) -> Self {
        Self {
            storage,
            debounce: DebounceCache::new(config.debounce_window(), config.debounce_max_entries),
            salt: config.clap_salt.clone(),
            max_per_request: config.max_claps_per_request,
        }
    }

    /// 查询资源的全局计数，从未被点赞的资源返回 0
    pub async fn count(&self, slug: &str) -> Result<i64, AppError> {
        Ok(self.storage.claps.read(slug).await?)
    }

    /// 记账主流程，顺序固定：去抖检查 → 数量收敛 → 限流准入 → 计数合并。
    /// 去抖只在准入成功后记录，被拒绝的请求不会武装去抖窗口。
    /// 准入与计数放在独立任务里跑完：调用方在中途断开时任务照常执行，
    /// 不会留下已准入未计数的半截请求
    pub async fn add_claps(
        &self,
        slug: &str,
        raw_address: &str,
        requested: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<ClapOutcome, AppError> {
        let token = identity::client_token(&self.salt, raw_address);

        if self.debounce.check(&token, slug) {
            return Ok(ClapOutcome::TooFast);
        }

        let amount = clamp_claps(requested, self.max_per_request);

        let storage = self.storage.clone();
        let task_token = token.clone();
        let task_slug = slug.to_string();
        let handle = tokio::spawn(async move {
            match storage
                .rate_limits
                .try_admit(&task_token, &task_slug, amount, now)
                .await?
            {
                Admission::Rejected => Ok(ClapOutcome::RateLimited),
                Admission::Accepted { window_count } => {
                    match storage.claps.increment(&task_slug, amount).await {
                        Ok(count) => {
                            tracing::debug!(
                                "claps accepted: slug={} applied={} window_count={} total={}",
                                task_slug,
                                amount,
                                window_count,
                                count
                            );
                            Ok(ClapOutcome::Accepted {
                                count,
                                applied: amount,
                            })
                        }
                        Err(e) => {
                            // 准入已扣减配额但增量未计入全局计数，本次增量丢失
                            tracing::error!(
                                "已准入的增量未能计入全局计数: slug={}, amount={}, 错误: {}",
                                task_slug,
                                amount,
                                e
                            );
                            Err(AppError::InconsistentState)
                        }
                    }
                }
            }
        });

        let outcome = match handle.await {
            Ok(result) => result?,
            Err(e) => {
                // 任务 panic，准入与计数是否生效未知
                tracing::error!("记账任务异常退出: {}", e);
                return Err(AppError::InconsistentState);
            }
        };

        if let ClapOutcome::Accepted { .. } = outcome {
            self.debounce.record(&token, slug);
        }
        Ok(outcome)
    }
}

/// 将请求数量收敛到 [1, max]：
/// 缺失或非数值取 1，非整数向下取整，低于 1 取 1，高于上限取上限
pub fn clamp_claps(requested: Option<f64>, max: u32) -> u32 {
    let max = max.max(1);
    let raw = match requested {
        Some(v) if v.is_finite() => v,
        _ => return 1,
    };
    let floored = raw.floor();
    if floored < 1.0 {
        1
    } else if floored >= max as f64 {
        max
    } else {
        floored as u32
    }
}
