use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{requests::GradeSubmissionRequest, responses::SubmissionResponse},
};
use crate::services::assignments::load_assignment;
use crate::services::{current_user, storage_error_response};

/// 分数必须在 0 到满分之间（含边界）
pub(crate) fn check_score(score: f64, max_score: f64) -> Result<(), String> {
    if !score.is_finite() || score < 0.0 || score > max_score {
        return Err(format!("Score must be between 0 and {max_score}"));
    }
    Ok(())
}

pub async fn grade_submission(
    service: &SubmissionService,
    submission_id: i64,
    data: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("查询提交失败", e)),
    };

    // 只有任课教师或管理员可以批改
    let assignment =
        match load_assignment(&storage, &user, submission.assignment_id, false).await {
            Ok((assignment, _, _)) => assignment,
            Err(resp) => return Ok(resp),
        };

    if let Err(msg) = check_score(data.score, assignment.max_score) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ScoreOutOfRange, msg)));
    }

    let feedback = data
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    match storage
        .grade_submission(submission_id, data.score, feedback, user.id)
        .await
    {
        Ok(Some(submission)) => {
            info!(
                "提交 {} 已由用户 {} 批改，得分 {}",
                submission.id, user.id, data.score
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse { submission },
                "批改成功",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Submission not found",
        ))),
        Err(e) => Ok(storage_error_response("批改提交失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_score_bounds() {
        assert!(check_score(0.0, 100.0).is_ok());
        assert!(check_score(100.0, 100.0).is_ok());
        assert!(check_score(100.5, 100.0).is_err());
        assert!(check_score(-1.0, 100.0).is_err());
        assert!(check_score(f64::NAN, 100.0).is_err());
    }
}
