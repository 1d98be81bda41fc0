use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn login_expired() -> HttpResponse {
    // 清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(login_expired());
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(login_expired());
    };

    // 以存储中的用户为准：角色可能已变更，账号可能已停用
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(login_expired()),
        Err(e) => return Ok(crate::services::storage_error_response("刷新令牌失败", e)),
    };

    match JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: JwtUtils::access_token_expires_in(),
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            )
        }
    }
}

pub async fn handle_logout(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logout successful")))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match current_user(request) {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
