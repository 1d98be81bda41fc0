use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
    users::entities::UserStatus,
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("Login failed: unknown user {}", login_request.username);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )));
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {}", e.message()),
                )),
            );
        }
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        tracing::info!("Login failed: wrong password for {}", user.username);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Username or password is incorrect",
        )));
    }

    // 3. 停用账号不能登录
    if user.status != UserStatus::Active {
        tracing::info!("Login rejected: account {} is {}", user.username, user.status);
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountDisabled,
            "Account is disabled",
        )));
    }

    // 4. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.id, e);
    }

    // 5. 生成令牌对
    let refresh_expiry = JwtUtils::refresh_token_expiry(login_request.remember_me);
    let token_pair = match user.generate_token_pair(Some(refresh_expiry)) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    tracing::info!("User {} logged in successfully", user.username);

    // 6. refresh token 写入 http-only cookie
    let refresh_cookie =
        JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_expiry);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: JwtUtils::access_token_expires_in(),
        user,
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
