pub mod admin;
pub mod announcements;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod homerooms;
pub mod schedules;
pub mod subjects;
pub mod submissions;
pub mod system;
pub mod topics;
pub mod users;

pub use admin::AdminService;
pub use announcements::AnnouncementService;
pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use homerooms::HomeroomService;
pub use schedules::ScheduleService;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use topics::TopicService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::{LmsError, Result};
use crate::middlewares::{ClassAccess, RequireJWT, require_class_access::resolve_access};
use crate::models::{
    ApiResponse, ErrorCode, classes::entities::Class, users::entities::User,
};
use crate::storage::Storage;

/// 从 app data 中取出存储
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not found in app data"))
}

/// 当前登录用户，需在 RequireJWT 之后使用
pub(crate) fn current_user(request: &HttpRequest) -> std::result::Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 将存储层错误转换为 HTTP 响应
///
/// 唯一约束冲突返回 409，其余错误记录日志后返回 500。
pub(crate) fn storage_error_response(context: &str, err: LmsError) -> HttpResponse {
    match err {
        LmsError::Conflict(msg) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("{context}: {msg}"),
        )),
        LmsError::NotFound(msg) => HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("{context}: {msg}"),
        )),
        LmsError::Validation(msg) => HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("{context}: {msg}"),
        )),
        other => {
            error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{context}: {}", other.message()),
            ))
        }
    }
}

/// 计算用户对某个班级的访问级别（用于不在 `/classes/{class_id}` 下的路由）
pub(crate) async fn class_access_for(
    storage: &Arc<dyn Storage>,
    user: &User,
    class: &Class,
    allow_students: bool,
) -> Result<Option<ClassAccess>> {
    let is_member = if allow_students && user.role.is_student() {
        storage.is_class_member(class.id, user.id).await?
    } else {
        false
    };
    Ok(resolve_access(user, class, is_member, allow_students))
}

/// 四舍五入到两位小数
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_storage_error_status() {
        let resp = storage_error_response("创建用户失败", LmsError::conflict("username"));
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
        let resp = storage_error_response("查询失败", LmsError::database_operation("boom"));
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
