use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, load_assignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_error_response};

pub async fn delete_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_assignment(&storage, &user, assignment_id, false).await {
        return Ok(resp);
    }

    match storage.delete_assignment(assignment_id).await {
        Ok(true) => {
            info!("用户 {} 删除了作业 {}", user.id, assignment_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("作业删除成功")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(storage_error_response("删除作业失败", e)),
    }
}
