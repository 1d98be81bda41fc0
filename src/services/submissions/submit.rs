use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::SubmissionService;
use crate::errors::LmsError;
use crate::middlewares::ClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        entities::{AssignmentKind, NewSubmission, SubmissionStatus},
        requests::SubmitAssignmentRequest,
        responses::SubmitAssignmentResponse,
    },
};
use crate::services::assignments::{load_assignment, quiz::grade_quiz};
use crate::services::{current_user, storage_error_response};

fn already_submitted() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::SubmissionAlreadyExists,
        "You have already submitted this assignment",
    ))
}

pub async fn submit_assignment(
    service: &SubmissionService,
    assignment_id: i64,
    data: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let (assignment, _, access) = match load_assignment(&storage, &user, assignment_id, true).await
    {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };
    if access != ClassAccess::Student {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "Only enrolled students can submit",
        )));
    }

    match storage.get_student_submission(assignment.id, user.id).await {
        Ok(Some(_)) => return Ok(already_submitted()),
        Ok(None) => {}
        Err(e) => return Ok(storage_error_response("查询提交失败", e)),
    }

    let is_late = assignment.is_late_at(chrono::Utc::now());

    let (new_submission, result) = match assignment.kind {
        AssignmentKind::Quiz => {
            let questions = match storage.list_questions(assignment.id, true).await {
                Ok(questions) => questions,
                Err(e) => return Ok(storage_error_response("获取题目失败", e)),
            };
            let (result, answers) = match grade_quiz(&questions, &data.answers) {
                Ok(graded) => graded,
                Err(msg) => {
                    return Ok(HttpResponse::BadRequest()
                        .json(ApiResponse::error_empty(ErrorCode::SubmissionInvalid, msg)));
                }
            };
            let submission = NewSubmission {
                assignment_id: assignment.id,
                student_id: user.id,
                content: None,
                status: SubmissionStatus::Graded,
                score: Some(result.score),
                is_late,
                answers,
            };
            (submission, Some(result))
        }
        AssignmentKind::Essay => {
            let content = data.content.as_deref().map(str::trim).unwrap_or_default();
            if content.is_empty() {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::SubmissionInvalid,
                    "Essay content cannot be empty",
                )));
            }
            let submission = NewSubmission {
                assignment_id: assignment.id,
                student_id: user.id,
                content: Some(content.to_string()),
                status: SubmissionStatus::Submitted,
                score: None,
                is_late,
                answers: Vec::new(),
            };
            (submission, None)
        }
    };

    match storage.create_submission(new_submission).await {
        Ok(submission) => {
            if submission.is_late {
                warn!("学生 {} 迟交作业 {}", user.id, assignment.id);
            }
            info!(
                "学生 {} 提交作业 {}，状态 {}",
                user.id, assignment.id, submission.status
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SubmitAssignmentResponse { submission, result },
                "提交成功",
            )))
        }
        // 并发重复提交由唯一索引拦截
        Err(LmsError::Conflict(_)) => Ok(already_submitted()),
        Err(e) => Ok(storage_error_response("创建提交失败", e)),
    }
}
