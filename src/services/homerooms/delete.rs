use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::HomeroomService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

pub async fn delete_homeroom(
    service: &HomeroomService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 仍有学生时不能删除
    match storage.count_homeroom_students(id).await {
        Ok(0) => {}
        Ok(count) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::HomeroomNotEmpty,
                format!("Homeroom still has {count} students"),
            )));
        }
        Err(e) => return Ok(storage_error_response("统计行政班学生失败", e)),
    }

    match storage.delete_homeroom(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("行政班删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::HomeroomNotFound,
            "Homeroom not found",
        ))),
        Err(e) => Ok(storage_error_response("删除行政班失败", e)),
    }
}
