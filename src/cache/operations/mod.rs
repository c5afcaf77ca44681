/// 缓存操作
/// 提供缓存操作的功能实现

// 点赞计数缓存操作
pub mod claps;

// 限流窗口缓存操作
pub mod rate_limit;

// 重新导出常用操作
pub use claps::{ClapCacheOperations, RedisClapStore};
pub use rate_limit::{RateLimitCacheOperations, RedisRateLimitStore};
