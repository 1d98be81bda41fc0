use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::LoginRequest;
use crate::models::users::requests::ChangePasswordRequest;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

pub async fn change_password(
    request: HttpRequest,
    data: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .change_password(data.into_inner(), &request)
        .await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .route(web::post().to(login))
                    .wrap(middlewares::RateLimit::login()),
            )
            .service(
                web::resource("/refresh")
                    .route(web::post().to(refresh_token))
                    .wrap(middlewares::RateLimit::refresh_token()),
            )
            .route("/logout", web::post().to(logout))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(get_user))
                    .route("/password", web::put().to(change_password)),
            ),
    );
}
