use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::HomeroomService;
use crate::models::{
    ApiResponse,
    homerooms::requests::{HomeroomListParams, HomeroomListQuery},
};
use crate::services::storage_error_response;

pub async fn list_homerooms(
    service: &HomeroomService,
    query: HomeroomListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = HomeroomListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        academic_year: query.academic_year,
        grade_level: query.grade_level,
        search: query.search,
    };

    match storage.list_homerooms_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Homeroom list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取行政班列表失败", e)),
    }
}
