use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::info;

use super::{AttendanceService, load_session};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{requests::BulkAttendanceRequest, responses::BulkAttendanceResponse},
};
use crate::services::homerooms::daily::collect_marks;
use crate::services::{current_user, storage_error_response};

/// 教师批量记录或覆盖场次考勤
pub async fn record_attendance(
    service: &AttendanceService,
    session_id: i64,
    data: BulkAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let class = match load_session(&storage, &user, session_id, false).await {
        Ok((_, class, _)) => class,
        Err(resp) => return Ok(resp),
    };

    let members: HashSet<i64> = match storage.list_class_members(class.id).await {
        Ok(members) => members.into_iter().map(|m| m.student.id).collect(),
        Err(e) => return Ok(storage_error_response("获取班级成员失败", e)),
    };
    let marks = match collect_marks(data.records, &members) {
        Ok(marks) => marks,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AttendanceRecordInvalid, msg)));
        }
    };

    match storage
        .upsert_attendance_records(session_id, marks, user.id)
        .await
    {
        Ok(updated) => {
            info!("场次 {} 更新了 {} 条考勤记录", session_id, updated);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BulkAttendanceResponse { updated },
                "考勤记录成功",
            )))
        }
        Err(e) => Ok(storage_error_response("记录考勤失败", e)),
    }
}
