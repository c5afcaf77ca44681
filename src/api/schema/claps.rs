// 点赞相关的数据结构定义

use serde::{Deserialize, Serialize};

/// 查询计数的请求参数
#[derive(Debug, Deserialize)]
pub struct CountClapsQuery {
    /// 资源标识
    pub slug: String,
}

/// 查询计数的响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ClapCountResponse {
    pub slug: String,
    /// 全局计数，从未被点赞的资源为 0
    pub count: i64,
}

/// 点赞请求
#[derive(Debug, Deserialize)]
pub struct AddClapsRequest {
    /// 资源标识
    pub slug: String,
    /// 请求的点赞数量，缺省为 1，服务端收敛到单次上限以内
    pub claps: Option<f64>,
}

/// 点赞响应
#[derive(Debug, Serialize, Deserialize)]
pub struct AddClapsResponse {
    pub slug: String,
    /// 合并后的全局计数
    pub count: i64,
    /// 本次实际计入的数量
    pub accepted: u32,
}
