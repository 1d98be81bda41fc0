use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_error_response};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 管理员不能删除自己
    if current.id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete the current user",
        )));
    }

    let storage = service.get_storage(request)?;
    match storage.delete_user(user_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("用户删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(storage_error_response("删除用户失败", e)),
    }
}
