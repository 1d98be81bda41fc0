use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::system::requests::UpdateSettingsRequest;
use crate::models::users::entities::UserRole;
use crate::services::SystemService;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn get_settings(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_settings(&request).await
}

pub async fn update_settings(
    request: HttpRequest,
    data: web::Json<UpdateSettingsRequest>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .update_settings(data.into_inner(), &request)
        .await
}

// 配置路由：所有登录用户可读，仅管理员可写
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .wrap(middleware::Compress::default())
            .wrap(middlewares::RequireJWT)
            .route("/settings", web::get().to(get_settings))
            .route(
                "/settings",
                web::put()
                    .to(update_settings)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
