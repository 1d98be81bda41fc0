use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, quiz::validate_assignment};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{requests::CreateAssignmentRequest, responses::AssignmentDetailResponse},
};
use crate::services::topics::{class_from_request, load_topic};
use crate::services::{current_user, storage_error_response};

pub async fn create_assignment(
    service: &AssignmentService,
    topic_id: i64,
    mut data: CreateAssignmentRequest,
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

    data.title = data.title.trim().to_string();
    if let Err(msg) = validate_assignment(&data) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    // 作业、题目和选项在同一事务中写入
    let assignment = match storage.create_assignment(topic_id, user.id, data).await {
        Ok(assignment) => assignment,
        Err(e) => return Ok(storage_error_response("创建作业失败", e)),
    };
    info!(
        "作业 {} 已创建（班级 {}，类型 {}）",
        assignment.id, class.id, assignment.kind
    );

    let questions = match storage.list_questions(assignment.id, true).await {
        Ok(questions) => questions,
        Err(e) => return Ok(storage_error_response("获取题目失败", e)),
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(
        AssignmentDetailResponse {
            assignment,
            class_id: class.id,
            questions,
        },
        "作业创建成功",
    )))
}
