use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::storage_error_response;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_full_name, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(email) = &update_data.email
        && let Err(msg) = validate_email(email.trim())
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Some(full_name) = &update_data.full_name
        && let Err(msg) = validate_full_name(full_name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserFullNameInvalid, msg)));
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                tracing::error!("Password hashing failed: {}", e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Password hashing failed",
                    )),
                );
            }
        }
    }

    let storage = service.get_storage(request)?;
    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "用户信息更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(LmsError::Conflict(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        ))),
        Err(e) => Ok(storage_error_response("更新用户失败", e)),
    }
}
