use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::reports::requests::AttendanceReportQuery;
use crate::models::users::entities::UserRole;
use crate::services::{AdminService, DashboardService};

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn student_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.student_dashboard(&req).await
}

pub async fn teacher_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.teacher_dashboard(&req).await
}

pub async fn admin_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.stats(&req).await
}

pub async fn admin_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_classes(&req).await
}

pub async fn attendance_report(
    req: HttpRequest,
    query: web::Query<AttendanceReportQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .attendance_report(query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireJWT)
            .route(
                "/student",
                web::get()
                    .to(student_dashboard)
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .route(
                "/teacher",
                web::get()
                    .to(teacher_dashboard)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/stats", web::get().to(admin_stats))
                    .route("/classes", web::get().to(admin_classes))
                    .route("/attendance-report", web::get().to(attendance_report)),
            ),
    );
}
