use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{
    GradeSubmissionRequest, SubmitAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, SubmissionService};
use crate::utils::SafeIDI64;

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn get_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(id.0, &req).await
}

pub async fn update_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(id.0, &req).await
}

pub async fn submit(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.submit(id.0, data.into_inner(), &req).await
}

pub async fn list_submissions(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_submissions(id.0, &req).await
}

pub async fn get_my_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_my_submission(id.0, &req).await
}

pub async fn grade_submission(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(id.0, data.into_inner(), &req)
        .await
}

// 配置路由：班级归属和访问级别在服务层按作业所属班级校验
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    let teachers = || middlewares::RequireRole::new_any(UserRole::teacher_roles());
    let students = || middlewares::RequireRole::new_any(UserRole::student_roles());

    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .route("/{id}", web::get().to(get_assignment))
            .route("/{id}", web::put().to(update_assignment).wrap(teachers()))
            .route("/{id}", web::delete().to(delete_assignment).wrap(teachers()))
            .route(
                "/{id}/submissions",
                web::post().to(submit).wrap(students()),
            )
            .route(
                "/{id}/submissions",
                web::get().to(list_submissions).wrap(teachers()),
            )
            .route(
                "/{id}/submissions/me",
                web::get().to(get_my_submission).wrap(students()),
            ),
    );
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .route(
                "/{id}/grade",
                web::put().to(grade_submission).wrap(teachers()),
            ),
    );
}
