use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TopicService, class_from_request, load_topic};
use crate::models::{ApiResponse, topics::responses::TopicDetailResponse};
use crate::services::storage_error_response;

/// 主题详情：材料、作业和考勤场次
pub async fn get_topic_detail(
    service: &TopicService,
    topic_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let topic = match load_topic(&storage, class.id, topic_id).await {
        Ok(topic) => topic,
        Err(resp) => return Ok(resp),
    };

    let materials = match storage.list_materials(topic.id).await {
        Ok(materials) => materials,
        Err(e) => return Ok(storage_error_response("获取材料失败", e)),
    };
    let assignments = match storage.list_assignments(topic.id).await {
        Ok(rows) => rows.into_iter().map(|(assignment, _)| assignment).collect(),
        Err(e) => return Ok(storage_error_response("获取作业失败", e)),
    };
    let attendance_sessions = match storage.list_attendance_sessions(topic.id).await {
        Ok(sessions) => sessions,
        Err(e) => return Ok(storage_error_response("获取考勤场次失败", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TopicDetailResponse {
            topic,
            materials,
            assignments,
            attendance_sessions,
        },
        "Topic retrieved successfully",
    )))
}
