use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttendanceService, load_session};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        requests::CreateSessionRequest,
        responses::{SessionListResponse, SessionResponse},
    },
};
use crate::services::topics::{class_from_request, load_topic, validate_title};
use crate::services::{current_user, storage_error_response};

pub(crate) fn validate_session(session: &CreateSessionRequest) -> Result<(), &'static str> {
    validate_title(&session.title)?;
    if session.opens_at >= session.closes_at {
        return Err("opens_at must be before closes_at");
    }
    Ok(())
}

pub async fn create_session(
    service: &AttendanceService,
    topic_id: i64,
    mut data: CreateSessionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    data.title = data.title.trim().to_string();
    if let Err(msg) = validate_session(&data) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AttendanceSessionInvalid, msg)));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    match storage.create_attendance_session(topic_id, user.id, data).await {
        Ok(session) => {
            info!("考勤场次 {} 已创建（班级 {}）", session.id, class.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SessionResponse { session },
                "考勤场次创建成功",
            )))
        }
        Err(e) => Ok(storage_error_response("创建考勤场次失败", e)),
    }
}

pub async fn list_sessions(
    service: &AttendanceService,
    topic_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    match storage.list_attendance_sessions(topic_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SessionListResponse { items },
            "Attendance sessions retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取考勤场次失败", e)),
    }
}

pub async fn delete_session(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_session(&storage, &user, session_id, false).await {
        return Ok(resp);
    }

    match storage.delete_attendance_session(session_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("考勤场次删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceSessionNotFound,
            "Attendance session not found",
        ))),
        Err(e) => Ok(storage_error_response("删除考勤场次失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_session_window_must_be_ordered() {
        let opens_at = Utc.with_ymd_and_hms(2025, 8, 4, 7, 0, 0).unwrap();
        let mut session = CreateSessionRequest {
            title: "Pertemuan 1".to_string(),
            opens_at,
            closes_at: opens_at + Duration::hours(1),
        };
        assert!(validate_session(&session).is_ok());
        session.closes_at = opens_at;
        assert!(validate_session(&session).is_err());
    }
}
