use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::{ApiResponse, assignments::responses::AssignmentDetailResponse};
use crate::services::{current_user, storage_error_response};

pub async fn get_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let (assignment, class, access) =
        match load_assignment(&storage, &user, assignment_id, true).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };

    // 学生看不到正确答案
    let questions = match storage
        .list_questions(assignment.id, access.can_manage())
        .await
    {
        Ok(questions) => questions,
        Err(e) => return Ok(storage_error_response("获取题目失败", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentDetailResponse {
            assignment,
            class_id: class.id,
            questions,
        },
        "Assignment retrieved successfully",
    )))
}
