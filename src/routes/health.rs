use axum::Json;

use crate::api::schema::common::ApiResponse;
use crate::utils::success_to_api_response;

/// 存活探针，不触达存储后端
#[axum::debug_handler]
pub async fn health() -> Json<ApiResponse<&'static str>> {
    success_to_api_response("ok")
}
