use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TopicService, class_from_request, load_topic, validate_title};
use crate::models::{
    ApiResponse, ErrorCode,
    topics::{requests::UpdateTopicRequest, responses::TopicResponse},
};
use crate::services::storage_error_response;

pub async fn update_topic(
    service: &TopicService,
    topic_id: i64,
    mut data: UpdateTopicRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    data.title = data.title.map(|t| t.trim().to_string());
    if let Some(title) = &data.title
        && let Err(msg) = validate_title(title)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::TopicInvalid, msg)));
    }
    if data.order_index.is_some_and(|i| i < 1) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::TopicInvalid,
            "order_index must be positive",
        )));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    match storage.update_topic(topic_id, data).await {
        Ok(Some(topic)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(TopicResponse { topic }, "主题更新成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TopicNotFound,
            "Topic not found",
        ))),
        Err(e) => Ok(storage_error_response("更新主题失败", e)),
    }
}
