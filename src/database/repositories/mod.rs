// 存储库实现
// 所有语句都用单条 SQL 表达原子语义，不在应用层做读-改-写

pub mod claps;
pub mod rate_limit;
