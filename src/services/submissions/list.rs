use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{ApiResponse, assignments::responses::SubmissionListResponse};
use crate::services::assignments::load_assignment;
use crate::services::{current_user, storage_error_response};

pub async fn list_submissions(
    service: &SubmissionService,
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

    match storage.list_submissions(assignment_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse { items },
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取提交列表失败", e)),
    }
}
