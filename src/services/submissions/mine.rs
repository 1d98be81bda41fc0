use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{ApiResponse, ErrorCode, assignments::responses::MySubmissionResponse};
use crate::services::assignments::load_assignment;
use crate::services::{current_user, storage_error_response};

pub async fn get_my_submission(
    service: &SubmissionService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_assignment(&storage, &user, assignment_id, true).await {
        return Ok(resp);
    }

    let submission = match storage.get_student_submission(assignment_id, user.id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "You have not submitted this assignment",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询提交失败", e)),
    };

    match storage.list_submission_answers(submission.id).await {
        Ok(answers) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MySubmissionResponse {
                submission,
                answers,
            },
            "Submission retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取答题记录失败", e)),
    }
}
