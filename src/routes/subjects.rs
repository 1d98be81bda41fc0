use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::SubjectService;
use crate::utils::SafeIDI64;

static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectListParams>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(query.into_inner(), &req).await
}

pub async fn create_subject(
    req: HttpRequest,
    data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.create_subject(data.into_inner(), &req).await
}

pub async fn get_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_subject(id.0, &req).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(id.0, &req).await
}

// 配置路由：所有登录用户可读，仅管理员可写
pub fn configure_subject_routes(cfg: &mut web::ServiceConfig) {
    let admin_only = || middlewares::RequireRole::new_any(UserRole::admin_roles());

    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_subjects))
            .route("", web::post().to(create_subject).wrap(admin_only()))
            .route("/{id}", web::get().to(get_subject))
            .route("/{id}", web::put().to(update_subject).wrap(admin_only()))
            .route("/{id}", web::delete().to(delete_subject).wrap(admin_only())),
    );
}
