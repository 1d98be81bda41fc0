use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::{ApiResponse, subjects::requests::SubjectListParams};
use crate::services::storage_error_response;

pub async fn list_subjects(
    service: &SubjectService,
    query: SubjectListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_subjects_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Subject list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取科目列表失败", e)),
    }
}
