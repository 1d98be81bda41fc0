use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse,
    users::requests::{UserListParams, UserListQuery},
};
use crate::services::storage_error_response;

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let list_query = UserListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        role: query.role,
        status: query.status,
        homeroom_id: query.homeroom_id,
        search: query.search,
    };

    match storage.list_users_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取用户列表失败", e)),
    }
}
