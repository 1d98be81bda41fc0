use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::AssignmentService;
use crate::middlewares::{ClassAccess, RequireClassAccess};
use crate::models::{
    ApiResponse,
    assignments::responses::{AssignmentListItem, AssignmentListResponse, SubmissionBrief},
};
use crate::services::topics::{class_from_request, load_topic};
use crate::services::{current_user, storage_error_response};

/// 主题下的作业列表；学生请求时附带自己的提交状态
pub async fn list_assignments(
    service: &AssignmentService,
    topic_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    let rows = match storage.list_assignments(topic_id).await {
        Ok(rows) => rows,
        Err(e) => return Ok(storage_error_response("获取作业列表失败", e)),
    };

    let mut mine = HashMap::new();
    if RequireClassAccess::extract_access(request) == Some(ClassAccess::Student) {
        let ids: Vec<i64> = rows.iter().map(|(a, _)| a.id).collect();
        match storage.list_student_submissions(user.id, &ids).await {
            Ok(submissions) => {
                mine = submissions
                    .iter()
                    .map(|s| (s.assignment_id, SubmissionBrief::from(s)))
                    .collect();
            }
            Err(e) => return Ok(storage_error_response("获取提交记录失败", e)),
        }
    }

    let items = rows
        .into_iter()
        .map(|(assignment, question_count)| AssignmentListItem {
            my_submission: mine.remove(&assignment.id),
            assignment,
            question_count,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentListResponse { items },
        "Assignments retrieved successfully",
    )))
}
