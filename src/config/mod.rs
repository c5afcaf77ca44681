use std::env;
use std::time::Duration;

/// 存储后端类型：postgres 提供原子条件写入，redis 为尽力而为的降级方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Redis,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub redis_url: String,
    pub clap_salt: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_claps: u32,
    pub max_claps_per_request: u32,
    pub debounce_window_ms: u64,
    pub debounce_max_entries: usize,
    pub retention_windows: u32,
    pub compaction_interval_secs: u64,
    pub compaction_batch_size: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        // 后端选择决定哪个连接串是必填项
        let storage_backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("redis") => StorageBackend::Redis,
            _ => StorageBackend::Postgres,
        };
        let database_url = match storage_backend {
            StorageBackend::Postgres => env::var("DATABASE_URL")?,
            StorageBackend::Redis => env::var("DATABASE_URL").unwrap_or_default(),
        };
        let redis_url = match storage_backend {
            StorageBackend::Redis => env::var("REDIS_URL")?,
            StorageBackend::Postgres => env::var("REDIS_URL").unwrap_or_default(),
        };

        Ok(Config {
            storage_backend,
            database_url,
            redis_url,
            clap_salt: env::var("CLAP_SALT")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")?.parse().unwrap_or(3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".to_string()),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW")?.parse().unwrap_or(3600),
            rate_limit_max_claps: env::var("RATE_LIMIT_MAX_CLAPS")?.parse().unwrap_or(50),
            max_claps_per_request: env::var("MAX_CLAPS_PER_REQUEST")?.parse().unwrap_or(10),
            debounce_window_ms: env::var("DEBOUNCE_WINDOW_MS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(500),
            debounce_max_entries: env::var("DEBOUNCE_MAX_ENTRIES")
                .unwrap_or_default()
                .parse()
                .unwrap_or(10_000),
            retention_windows: env::var("RETENTION_WINDOWS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(2),
            compaction_interval_secs: env::var("COMPACTION_INTERVAL")
                .unwrap_or_default()
                .parse()
                .unwrap_or(86_400),
            compaction_batch_size: env::var("COMPACTION_BATCH_SIZE")
                .unwrap_or_default()
                .parse()
                .unwrap_or(1000),
        })
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    pub fn compaction_interval(&self) -> Duration {
        Duration::from_secs(self.compaction_interval_secs)
    }

    /// 限流记录保留时长，超过后由压缩任务删除或由 Redis TTL 过期
    pub fn retention_secs(&self) -> u64 {
        self.rate_limit_window_secs * self.retention_windows as u64
    }
}
