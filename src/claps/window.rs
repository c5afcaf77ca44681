//! 固定窗口时间计算
//! 窗口起点对齐到窗口长度的整数倍，限流记录按 (客户端, 资源, 窗口起点) 分桶

/// 计算时间戳所属窗口的起点：floor(now / W) * W
pub fn window_start(now_ts: i64, window_secs: u64) -> i64 {
    let w = window_secs.max(1) as i64;
    now_ts.div_euclid(w) * w
}

/// 压缩截止线：早于该时间戳的窗口记录可以被删除
pub fn retention_cutoff(now_ts: i64, window_secs: u64, retention_windows: u32) -> i64 {
    let span = window_secs
        .saturating_mul(retention_windows as u64)
        .min(i64::MAX as u64) as i64;
    now_ts.saturating_sub(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: u64 = 3600;

    #[test]
    fn window_start_is_floor_aligned() {
        assert_eq!(window_start(0, HOUR), 0);
        assert_eq!(window_start(1, HOUR), 0);
        assert_eq!(window_start(3599, HOUR), 0);
        assert_eq!(window_start(3600, HOUR), 3600);
        assert_eq!(window_start(7199, HOUR), 3600);
    }

    #[test]
    fn window_start_is_stable_within_a_window() {
        let base = 1_700_000_000i64;
        let start = window_start(base, HOUR);
        for offset in [0, 1, 600, 3599] {
            assert_eq!(window_start(start + offset, HOUR), start);
        }
        assert_eq!(window_start(start + 3600, HOUR), start + 3600);
    }

    #[test]
    fn window_start_floors_negative_timestamps() {
        // div_euclid 向下取整，负时间戳也落在正确的窗口
        assert_eq!(window_start(-1, HOUR), -3600);
        assert_eq!(window_start(-3600, HOUR), -3600);
        assert_eq!(window_start(-3601, HOUR), -7200);
    }

    #[test]
    fn zero_window_does_not_divide_by_zero() {
        assert_eq!(window_start(42, 0), 42);
    }

    #[test]
    fn retention_cutoff_spans_two_windows_by_default() {
        let now = 1_700_000_000i64;
        assert_eq!(retention_cutoff(now, HOUR, 2), now - 7200);
    }

    #[test]
    fn retention_cutoff_saturates_on_extreme_values() {
        let cutoff = retention_cutoff(i64::MIN + 1, u64::MAX, u32::MAX);
        assert_eq!(cutoff, i64::MIN);
    }
}
