/// 点赞计数缓存键前缀
const CLAP_COUNT_PREFIX: &str = "claps:count:";

/// 限流窗口记录键前缀
const RATE_LIMIT_PREFIX: &str = "claps:rate:";

/// 生成点赞计数键
pub fn clap_count_key(slug: &str) -> String {
    format!("{}{}", CLAP_COUNT_PREFIX, slug)
}

/// 生成限流窗口记录键。窗口起点编入键中，
/// 新窗口自然落到新键上，旧键由 TTL 过期回收
pub fn rate_limit_key(client_token: &str, slug: &str, window_start: i64) -> String {
    format!(
        "{}{}:{}:{}",
        RATE_LIMIT_PREFIX, client_token, slug, window_start
    )
}
