use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{DailyAttendanceQuery, DailyAttendanceRequest};
use crate::models::homerooms::requests::{
    AssignStudentsRequest, CreateHomeroomRequest, CreateNoteRequest, HomeroomListParams,
    NoteListParams, UpdateHomeroomRequest, UpdateNoteRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::HomeroomService;
use crate::utils::{SafeIDI64, SafeNoteIdI64};

static HOMEROOM_SERVICE: Lazy<HomeroomService> = Lazy::new(HomeroomService::new_lazy);

pub async fn list_homerooms(
    req: HttpRequest,
    query: web::Query<HomeroomListParams>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .list_homerooms(query.into_inner(), &req)
        .await
}

pub async fn create_homeroom(
    req: HttpRequest,
    data: web::Json<CreateHomeroomRequest>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .create_homeroom(data.into_inner(), &req)
        .await
}

pub async fn get_homeroom(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE.get_homeroom(id.0, &req).await
}

pub async fn update_homeroom(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateHomeroomRequest>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .update_homeroom(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_homeroom(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE.delete_homeroom(id.0, &req).await
}

pub async fn list_students(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE.list_students(id.0, &req).await
}

pub async fn assign_students(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<AssignStudentsRequest>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .assign_students(id.0, data.into_inner(), &req)
        .await
}

pub async fn grade_recap(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE.grade_recap(id.0, &req).await
}

pub async fn attendance_recap(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE.attendance_recap(id.0, &req).await
}

pub async fn list_notes(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<NoteListParams>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .list_notes(id.0, query.into_inner(), &req)
        .await
}

pub async fn create_note(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<CreateNoteRequest>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .create_note(id.0, data.into_inner(), &req)
        .await
}

pub async fn update_note(
    req: HttpRequest,
    id: SafeIDI64,
    note_id: SafeNoteIdI64,
    data: web::Json<UpdateNoteRequest>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .update_note(id.0, note_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_note(
    req: HttpRequest,
    id: SafeIDI64,
    note_id: SafeNoteIdI64,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE.delete_note(id.0, note_id.0, &req).await
}

pub async fn record_daily_attendance(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<DailyAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .record_daily_attendance(id.0, data.into_inner(), &req)
        .await
}

pub async fn list_daily_attendance(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<DailyAttendanceQuery>,
) -> ActixResult<HttpResponse> {
    HOMEROOM_SERVICE
        .list_daily_attendance(id.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_homeroom_routes(cfg: &mut web::ServiceConfig) {
    let admin_only = || middlewares::RequireRole::new_any(UserRole::admin_roles());
    // 班主任的权限范围（仅限自己的行政班）在服务层校验
    let homeroom_staff = || middlewares::RequireRole::new_any(UserRole::homeroom_roles());

    cfg.service(
        web::scope("/api/v1/homerooms")
            .wrap(middlewares::RequireJWT)
            .route(
                "",
                web::get()
                    .to(list_homerooms)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .route("", web::post().to(create_homeroom).wrap(admin_only()))
            .route("/{id}", web::get().to(get_homeroom).wrap(homeroom_staff()))
            .route("/{id}", web::put().to(update_homeroom).wrap(admin_only()))
            .route("/{id}", web::delete().to(delete_homeroom).wrap(admin_only()))
            .route(
                "/{id}/students",
                web::get().to(list_students).wrap(homeroom_staff()),
            )
            .route(
                "/{id}/students",
                web::put().to(assign_students).wrap(admin_only()),
            )
            .route(
                "/{id}/grades",
                web::get().to(grade_recap).wrap(homeroom_staff()),
            )
            .route(
                "/{id}/attendance",
                web::get().to(attendance_recap).wrap(homeroom_staff()),
            )
            .route(
                "/{id}/daily-attendance",
                web::get().to(list_daily_attendance).wrap(homeroom_staff()),
            )
            .route(
                "/{id}/daily-attendance",
                web::put().to(record_daily_attendance).wrap(homeroom_staff()),
            )
            .route("/{id}/notes", web::get().to(list_notes).wrap(homeroom_staff()))
            .route("/{id}/notes", web::post().to(create_note).wrap(homeroom_staff()))
            .route(
                "/{id}/notes/{note_id}",
                web::put().to(update_note).wrap(homeroom_staff()),
            )
            .route(
                "/{id}/notes/{note_id}",
                web::delete().to(delete_note).wrap(homeroom_staff()),
            ),
    );
}
