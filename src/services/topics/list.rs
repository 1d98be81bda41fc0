use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TopicService, class_from_request};
use crate::models::{ApiResponse, topics::responses::TopicListResponse};
use crate::services::storage_error_response;

pub async fn list_topics(
    service: &TopicService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.list_topics(class.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TopicListResponse { items },
            "Topics retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取主题列表失败", e)),
    }
}
