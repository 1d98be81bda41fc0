use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{
    ApiResponse, classes::requests::ClassListQuery, reports::responses::AdminClassListResponse,
};
use crate::services::storage_error_response;

/// 全部班级（含科目、教师和成员数）
pub async fn list_all_classes(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_class_details(ClassListQuery::default()).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdminClassListResponse { items },
            "Classes retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取班级列表失败", e)),
    }
}
