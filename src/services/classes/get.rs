use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::middlewares::RequireClassAccess;
use crate::models::{ApiResponse, ErrorCode, classes::responses::ClassResponse};
use crate::services::storage_error_response;

pub async fn get_class(service: &ClassService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(class) = RequireClassAccess::extract_class(request) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        )));
    };
    let storage = service.get_storage(request)?;

    match storage.get_class_detail(class.id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassResponse { class: detail },
            "Class retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(storage_error_response("获取班级失败", e)),
    }
}
