use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttendanceService, load_session};
use crate::errors::LmsError;
use crate::middlewares::ClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{entities::AttendanceStatus, responses::CheckInResponse},
};
use crate::services::{current_user, storage_error_response};

/// 学生在签到窗口内自行签到
pub async fn check_in(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let session = match load_session(&storage, &user, session_id, true).await {
        Ok((session, _, ClassAccess::Student)) => session,
        Ok(_) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "Only enrolled students can check in",
            )));
        }
        Err(resp) => return Ok(resp),
    };

    if !session.is_open_at(chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AttendanceSessionClosed,
            "Attendance session is not open",
        )));
    }

    match storage
        .create_attendance_record(session.id, user.id, AttendanceStatus::Hadir, None)
        .await
    {
        Ok(record) => {
            info!("学生 {} 在场次 {} 签到", user.id, session.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(CheckInResponse { record }, "签到成功")))
        }
        Err(LmsError::Conflict(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AttendanceAlreadyRecorded,
            "Attendance already recorded",
        ))),
        Err(e) => Ok(storage_error_response("签到失败", e)),
    }
}
