use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::requests::{ChangePasswordRequest, UpdateUserRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_error_response};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    // 请求扩展中的用户可能来自缓存，以存储中的密码哈希为准
    let stored = match storage.get_user_by_id(user.id).await {
        Ok(Some(stored)) => stored,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "用户不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response("获取用户失败", e)),
    };

    if !verify_password(&change_request.old_password, &stored.password_hash) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::OldPasswordIncorrect,
            "旧密码不正确",
        )));
    }

    if let Err(msg) = validate_password_simple(&change_request.new_password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            msg,
        )));
    }

    let hashed = match hash_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "密码哈希失败",
                )),
            );
        }
    };

    let update = UpdateUserRequest {
        password: Some(hashed),
        ..Default::default()
    };
    match storage.update_user(user.id, update).await {
        Ok(Some(_)) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("密码修改成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "用户不存在",
        ))),
        Err(e) => Ok(storage_error_response("修改密码失败", e)),
    }
}
