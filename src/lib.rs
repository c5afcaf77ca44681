use std::sync::Arc;

use config::Config;

pub mod api;
pub mod cache;
pub mod claps;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod storage;
pub mod utils;

use claps::ClapService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service: Arc<ClapService>,
}
