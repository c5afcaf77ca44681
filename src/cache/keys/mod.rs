/// 缓存键模块
/// 提供各种缓存键生成函数

// 点赞相关缓存键模块
pub mod clap_keys;

// 重新导出常用的键生成函数
pub use clap_keys::{clap_count_key, rate_limit_key};
