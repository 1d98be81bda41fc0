use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::errors::LmsError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

pub async fn delete_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 仍有学生选课时不能删除
    match storage.count_class_members(class_id).await {
        Ok(0) => {}
        Ok(count) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassHasMembers,
                format!("Class still has {count} enrolled students"),
            )));
        }
        Err(e) => return Ok(storage_error_response("统计班级成员失败", e)),
    }

    match storage.delete_class(class_id).await {
        Ok(true) => {
            tracing::info!("Class {} deleted", class_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("班级删除成功")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        // 统计之后又有学生加入
        Err(LmsError::Conflict(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::ClassHasMembers, msg),
        )),
        Err(e) => Ok(storage_error_response("删除班级失败", e)),
    }
}
