// 对外 API 的数据结构定义

pub mod schema;
