use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::storage::StoreError;
use crate::utils::{error_codes, error_to_api_response};

/// 基础设施类错误。限流与去抖拒绝是正常业务结果，不在这里，
/// 见 `ClapOutcome`
#[derive(Debug)]
pub enum AppError {
    /// 请求参数不合法
    InvalidInput(String),
    /// 存储后端不可用
    StoreUnavailable(StoreError),
    /// 已准入的增量未能计入全局计数，本次增量丢失
    InconsistentState,
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreUnavailable(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // 参数错误属于业务结果，HTTP 层保持 200，错误码放在响应体里
            AppError::InvalidInput(msg) => (
                StatusCode::OK,
                error_to_api_response::<()>(error_codes::VALIDATION_ERROR, msg),
            )
                .into_response(),
            AppError::StoreUnavailable(e) => {
                tracing::error!("存储后端不可用: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    error_to_api_response::<()>(
                        error_codes::SERVICE_UNAVAILABLE,
                        "存储服务暂时不可用，请稍后重试".to_string(),
                    ),
                )
                    .into_response()
            }
            AppError::InconsistentState => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "内部服务器错误".to_string(),
                ),
            )
                .into_response(),
        }
    }
}
