use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::{ApiResponse, ErrorCode, subjects::responses::SubjectResponse};
use crate::services::storage_error_response;

pub async fn get_subject(
    service: &SubjectService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_subject_by_id(id).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectResponse { subject },
            "Subject retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubjectNotFound,
            "Subject not found",
        ))),
        Err(e) => Ok(storage_error_response("获取科目失败", e)),
    }
}
