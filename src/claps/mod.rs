// 记账核心模块
// 身份散列、固定窗口、去抖缓存与请求协调流程

pub mod compactor;
pub mod debounce;
pub mod identity;
pub mod service;
pub mod window;

// 重新导出常用类型，方便其他模块使用
pub use service::{ClapOutcome, ClapService};
