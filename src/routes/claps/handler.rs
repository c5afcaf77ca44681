use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::AppState;
use crate::api::schema::claps::{
    AddClapsRequest, AddClapsResponse, ClapCountResponse, CountClapsQuery,
};
use crate::claps::ClapOutcome;
use crate::error::AppError;
use crate::utils::{
    client_address, error_codes, error_to_api_response, success_to_api_response, validate_slug,
};

/// 查询资源的全局点赞计数
#[axum::debug_handler]
pub async fn count_claps(
    State(state): State<AppState>,
    Query(query): Query<CountClapsQuery>,
) -> Result<impl IntoResponse, AppError> {
    validate_slug(&query.slug)?;

    let count = state.service.count(&query.slug).await?;
    Ok((
        StatusCode::OK,
        success_to_api_response(ClapCountResponse {
            slug: query.slug,
            count,
        }),
    ))
}

/// 为资源点赞。限流与去抖拒绝返回 200 + 业务错误码，
/// 前端据此提示用户而不是当作请求失败
#[axum::debug_handler]
pub async fn add_claps(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<AddClapsRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_slug(&req.slug)?;

    let address = client_address(&headers, Some(addr));
    let outcome = state
        .service
        .add_claps(&req.slug, &address, req.claps, chrono::Utc::now())
        .await?;

    Ok(match outcome {
        ClapOutcome::Accepted { count, applied } => (
            StatusCode::OK,
            success_to_api_response(AddClapsResponse {
                slug: req.slug,
                count,
                accepted: applied,
            }),
        ),
        ClapOutcome::RateLimited => (
            StatusCode::OK,
            error_to_api_response(
                error_codes::RATE_LIMIT,
                format!(
                    "点赞过于频繁，请在{}秒后重试",
                    state.config.rate_limit_window().as_secs()
                ),
            ),
        ),
        ClapOutcome::TooFast => (
            StatusCode::OK,
            error_to_api_response(
                error_codes::TOO_FAST,
                "手速太快了，稍等片刻再试".to_string(),
            ),
        ),
    })
}
