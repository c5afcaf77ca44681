use std::time::{Duration, Instant};

use dashmap::DashMap;

/// 进程内去抖缓存，按 (客户端令牌, 资源) 记录最近一次被接受的时间。
/// 只用于吸收前端的重复提交，多实例部署下互不感知，不承担限流职责。
/// 容量有界：超限时先清扫过期项，仍超限则整体清空。
pub struct DebounceCache {
    seen: DashMap<String, Instant>,
    window: Duration,
    max_entries: usize,
}

impl DebounceCache {
    pub fn new(window: Duration, max_entries: usize) -> Self {
        Self {
            seen: DashMap::new(),
            window,
            max_entries: max_entries.max(1),
        }
    }

    /// 该键在去抖窗口内是否已有被接受的请求
    pub fn check(&self, client_token: &str, slug: &str) -> bool {
        self.seen
            .get(&cache_key(client_token, slug))
            .map(|e| e.value().elapsed() < self.window)
            .unwrap_or(false)
    }

    /// 请求被接受后记录时间戳
    pub fn record(&self, client_token: &str, slug: &str) {
        self.seen.insert(cache_key(client_token, slug), Instant::now());
        if self.seen.len() > self.max_entries {
            self.sweep();
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn sweep(&self) {
        self.seen.retain(|_, last| last.elapsed() < self.window);
        if self.seen.len() > self.max_entries {
            self.seen.clear();
        }
    }
}

fn cache_key(client_token: &str, slug: &str) -> String {
    format!("{}:{}", client_token, slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_request_within_window_is_too_fast() {
        let cache = DebounceCache::new(Duration::from_millis(500), 100);
        assert!(!cache.check("token", "slug"));
        cache.record("token", "slug");
        assert!(cache.check("token", "slug"));
    }

    #[test]
    fn check_without_record_leaves_no_trace() {
        let cache = DebounceCache::new(Duration::from_millis(500), 100);
        assert!(!cache.check("token", "slug"));
        assert!(!cache.check("token", "slug"));
        assert!(cache.is_empty());
    }

    #[test]
    fn different_pairs_do_not_interfere() {
        let cache = DebounceCache::new(Duration::from_millis(500), 100);
        cache.record("token-a", "slug");
        assert!(!cache.check("token-b", "slug"));
        assert!(!cache.check("token-a", "other-slug"));
    }

    #[test]
    fn entry_expires_after_window() {
        let cache = DebounceCache::new(Duration::from_millis(20), 100);
        cache.record("token", "slug");
        assert!(cache.check("token", "slug"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(!cache.check("token", "slug"));
    }

    #[test]
    fn zero_window_disables_debounce() {
        let cache = DebounceCache::new(Duration::ZERO, 100);
        cache.record("token", "slug");
        assert!(!cache.check("token", "slug"));
    }

    #[test]
    fn cache_stays_bounded_under_distinct_keys() {
        let cache = DebounceCache::new(Duration::from_secs(60), 50);
        for i in 0..200 {
            cache.record(&format!("token-{}", i), "slug");
        }
        // 条目都未过期，清扫后整体清空保证上界
        assert!(cache.len() <= 51);
    }

    #[test]
    fn sweep_prefers_dropping_expired_entries() {
        let cache = DebounceCache::new(Duration::from_millis(100), 10);
        for i in 0..10 {
            cache.record(&format!("old-{}", i), "slug");
        }
        std::thread::sleep(Duration::from_millis(150));
        cache.record("fresh", "slug");
        // 过期条目被清扫，新条目保留
        assert!(cache.check("fresh", "slug"));
        assert_eq!(cache.len(), 1);
    }
}
