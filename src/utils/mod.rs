use std::net::SocketAddr;

use axum::Json;
use axum::http::HeaderMap;
use serde::Serialize;

use crate::api::schema::common::ApiResponse;
use crate::claps::identity::UNKNOWN_ADDRESS;
use crate::error::AppError;

/// 资源标识的最大长度，与存储层 VARCHAR(200) 保持一致
pub const MAX_SLUG_LEN: usize = 200;

/// 校验资源标识：非空、不超长、只允许小写字母数字与 - _ . /
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() {
        return Err(AppError::InvalidInput("资源标识不能为空".to_string()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(AppError::InvalidInput(format!(
            "资源标识过长，最多{}个字符",
            MAX_SLUG_LEN
        )));
    }
    let valid = slug.chars().all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.' | '/')
    });
    if !valid {
        return Err(AppError::InvalidInput(
            "资源标识只允许小写字母、数字与 - _ . /".to_string(),
        ));
    }
    Ok(())
}

/// 解析客户端地址：x-real-ip → x-forwarded-for 首个非空段 → 连接地址。
/// 都拿不到时退回 "unknown" 哨兵，散列后所有未知客户端共享一个令牌，
/// 一起受同一份配额约束
pub fn client_address(headers: &HeaderMap, connect: Option<SocketAddr>) -> String {
    let remote_ip = connect.map(|addr| addr.ip().to_string());
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or_else(|| remote_ip.as_deref())
        .unwrap_or(UNKNOWN_ADDRESS)
        .trim()
        .to_string()
}

// 所有 handler 统一返回 Json<ApiResponse<T>>
pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: 0,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const RATE_LIMIT: i32 = 1005;
    pub const TOO_FAST: i32 = 1006;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn slug_accepts_typical_post_paths() {
        assert!(validate_slug("my-first-post").is_ok());
        assert!(validate_slug("2024/07/rust-notes").is_ok());
        assert!(validate_slug("a.b_c").is_ok());
    }

    #[test]
    fn slug_rejects_empty_and_oversized() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN)).is_ok());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }

    #[test]
    fn slug_rejects_illegal_characters() {
        assert!(validate_slug("Post").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug("héllo").is_err());
        assert!(validate_slug("a;b").is_err());
    }

    #[test]
    fn real_ip_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.9"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        let connect: SocketAddr = "192.0.2.1:443".parse().unwrap();
        assert_eq!(client_address(&headers, Some(connect)), "203.0.113.9");
    }

    #[test]
    fn forwarded_for_uses_first_nonempty_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" , 10.0.0.1, 10.0.0.2"),
        );
        assert_eq!(client_address(&headers, None), "10.0.0.1");
    }

    #[test]
    fn falls_back_to_connect_address_then_sentinel() {
        let headers = HeaderMap::new();
        let connect: SocketAddr = "192.0.2.1:443".parse().unwrap();
        assert_eq!(client_address(&headers, Some(connect)), "192.0.2.1");
        assert_eq!(client_address(&headers, None), UNKNOWN_ADDRESS);
    }
}
