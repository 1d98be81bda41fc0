use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::info;

use crate::models::{ApiResponse, ErrorCode};

// JSON 请求体解析失败
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    info!("Invalid JSON body for {}: {}", req.path(), err);
    let message = format!("Invalid JSON body: {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}

// 查询参数解析失败
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    info!("Invalid query string for {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(err, response).into()
}
