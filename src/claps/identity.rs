use sha2::{Digest, Sha256};

/// 未能提供来源地址时使用的哨兵地址，所有此类请求共享同一个限流分区
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// 由部署级盐值和客户端地址派生匿名身份令牌。
/// 单向散列，相同盐值下稳定，不同部署（不同盐值）之间不可关联。
pub fn client_token(salt: &str, raw_address: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", salt, raw_address));
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
