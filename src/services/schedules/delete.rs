use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

pub async fn delete_schedule(
    service: &ScheduleService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_schedule(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课表删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleNotFound,
            "Schedule not found",
        ))),
        Err(e) => Ok(storage_error_response("删除课表失败", e)),
    }
}
