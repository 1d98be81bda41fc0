use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

pub async fn delete_subject(
    service: &SubjectService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 仍被课程班级使用时不能删除
    match storage.is_subject_in_use(id).await {
        Ok(false) => {}
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::SubjectInUse,
                "Subject is still used by a class",
            )));
        }
        Err(e) => return Ok(storage_error_response("检查科目引用失败", e)),
    }

    match storage.delete_subject(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("科目删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubjectNotFound,
            "Subject not found",
        ))),
        Err(e) => Ok(storage_error_response("删除科目失败", e)),
    }
}
