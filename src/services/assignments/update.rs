use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{requests::UpdateAssignmentRequest, responses::AssignmentDetailResponse},
};
use crate::services::topics::validate_title;
use crate::services::{current_user, storage_error_response};

pub async fn update_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    mut data: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    data.title = data.title.map(|t| t.trim().to_string());
    if let Some(title) = &data.title
        && let Err(msg) = validate_title(title)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    let storage = service.get_storage(request)?;
    let class = match load_assignment(&storage, &user, assignment_id, false).await {
        Ok((_, class, _)) => class,
        Err(resp) => return Ok(resp),
    };

    let assignment = match storage.update_assignment(assignment_id, data).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("更新作业失败", e)),
    };

    let questions = match storage.list_questions(assignment.id, true).await {
        Ok(questions) => questions,
        Err(e) => return Ok(storage_error_response("获取题目失败", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentDetailResponse {
            assignment,
            class_id: class.id,
            questions,
        },
        "作业更新成功",
    )))
}
