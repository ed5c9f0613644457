//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error};
use serde::Serialize;
use tracing::error as log_error;

use crate::errors::FieldtrackError;

/// 统一响应包装：{success, data?, error?}
#[derive(Serialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        })
}

/// 构建错误响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message.to_string()),
        })
}

/// 从 FieldtrackError 构建错误响应
///
/// 500 一律返回通用文案，完整细节只进运维日志。
pub fn error_from_fieldtrack(err: &FieldtrackError) -> HttpResponse {
    let status = err.http_status();
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        log_error!("[{}] {}", err.code(), err);
        error_response(status, "Internal server error")
    } else {
        error_response(status, err.message())
    }
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<FieldtrackError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_fieldtrack(&e.into()),
    }
}

/// JSON 请求体解析失败 → 400，保持统一响应包装
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = error_response(StatusCode::BAD_REQUEST, &message);
    error::InternalError::from_response(err, response).into()
}

/// 查询参数解析失败 → 400，保持统一响应包装
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = error_response(StatusCode::BAD_REQUEST, &message);
    error::InternalError::from_response(err, response).into()
}
