use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TopicService, class_from_request, load_topic};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

pub async fn delete_topic(
    service: &TopicService,
    topic_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    // 材料、作业和考勤场次随主题级联删除
    match storage.delete_topic(topic_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("主题删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TopicNotFound,
            "Topic not found",
        ))),
        Err(e) => Ok(storage_error_response("删除主题失败", e)),
    }
}
