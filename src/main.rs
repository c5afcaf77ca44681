use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use claps_backend::{
    AppState,
    claps::{ClapService, compactor},
    config::Config,
    middleware::log_errors,
    routes,
    storage::Storage,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    // 连接存储后端
    let storage = Storage::connect(&config)
        .await
        .expect("Failed to connect storage backend");

    // 启动后台窗口压缩任务
    tokio::spawn(compactor::run_window_compactor(
        storage.clone(),
        config.clone(),
    ));

    // 设置应用状态
    let state = AppState {
        config: config.clone(),
        service: Arc::new(ClapService::new(storage, &config)),
    };

    // 点赞路由
    let clap_routes = Router::new()
        .route("/claps/count", get(routes::claps::count_claps))
        .route("/claps/add", post(routes::claps::add_claps))
        .route("/health", get(routes::health::health));

    // 创建基础路由
    let router = Router::new().nest(&config.api_base_uri.clone(), clap_routes);

    // 添加日志中间件
    let router = router.layer(axum::middleware::from_fn(log_errors));

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        // 开发环境允许所有来源，方便本地前端调试
        let cors = CorsLayer::permissive();
        router.layer(cors)
    };

    // 添加应用状态
    let app = router.with_state(state.clone());

    // 启动服务器
    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
