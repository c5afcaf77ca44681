use serde::{Deserialize, Serialize};

/// 限流窗口在 Redis 中的缓存记录，以 JSON 字符串存储
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CachedRateLimit {
    /// 所属窗口起点，Unix 秒
    pub window_start: i64,
    /// 该窗口内已消费的数量
    pub count: u32,
    /// 最近一次写入时间，Unix 秒
    pub updated_at: i64,
}
