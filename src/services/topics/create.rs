use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TopicService, class_from_request, validate_title};
use crate::models::{
    ApiResponse, ErrorCode,
    topics::{requests::CreateTopicRequest, responses::TopicResponse},
};
use crate::services::storage_error_response;

pub async fn create_topic(
    service: &TopicService,
    mut data: CreateTopicRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    data.title = data.title.trim().to_string();
    if let Err(msg) = validate_title(&data.title) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::TopicInvalid, msg)));
    }

    let storage = service.get_storage(request)?;
    // order_index 由存储层取 max + 1
    match storage.create_topic(class.id, data).await {
        Ok(topic) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(TopicResponse { topic }, "主题创建成功"))),
        Err(e) => Ok(storage_error_response("创建主题失败", e)),
    }
}
