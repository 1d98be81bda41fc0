use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::BulkAttendanceRequest;
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn get_session(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_session(id.0, &req).await
}

pub async fn delete_session(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_session(id.0, &req).await
}

pub async fn check_in(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.check_in(id.0, &req).await
}

pub async fn record_attendance(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<BulkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .record_attendance(id.0, data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    let teachers = || middlewares::RequireRole::new_any(UserRole::teacher_roles());

    cfg.service(
        web::scope("/api/v1/attendance/sessions")
            .wrap(middlewares::RequireJWT)
            .route("/{id}", web::get().to(get_session))
            .route("/{id}", web::delete().to(delete_session).wrap(teachers()))
            .route(
                "/{id}/check-in",
                web::post()
                    .to(check_in)
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .route(
                "/{id}/records",
                web::put().to(record_attendance).wrap(teachers()),
            ),
    );
}
