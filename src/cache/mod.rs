// 缓存模块
// Redis 后端的键生成、数据模型与操作逻辑

pub mod keys;
pub mod models;
pub mod operations;

// 重新导出常用类型和函数，方便其他模块使用
pub use models::rate_limit::CachedRateLimit;
pub use operations::claps::{ClapCacheOperations, RedisClapStore};
pub use operations::rate_limit::{RateLimitCacheOperations, RedisRateLimitStore};
