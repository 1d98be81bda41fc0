use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::announcements::requests::{
    AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AnnouncementService;
use crate::utils::SafeIDI64;

static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> =
    Lazy::new(AnnouncementService::new_lazy);

pub async fn list_announcements(
    req: HttpRequest,
    query: web::Query<AnnouncementListParams>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .list_announcements(query.into_inner(), &req)
        .await
}

pub async fn create_announcement(
    req: HttpRequest,
    data: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .create_announcement(data.into_inner(), &req)
        .await
}

pub async fn update_announcement(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .update_announcement(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_announcement(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE.delete_announcement(id.0, &req).await
}

// 配置路由：作者或管理员才能修改，在服务层校验
pub fn configure_announcement_routes(cfg: &mut web::ServiceConfig) {
    let teachers = || middlewares::RequireRole::new_any(UserRole::teacher_roles());

    cfg.service(
        web::scope("/api/v1/announcements")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_announcements))
            .route("", web::post().to(create_announcement).wrap(teachers()))
            .route("/{id}", web::put().to(update_announcement).wrap(teachers()))
            .route(
                "/{id}",
                web::delete().to(delete_announcement).wrap(teachers()),
            ),
    );
}
