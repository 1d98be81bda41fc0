use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{HashMap, HashSet};

use super::{HomeroomService, load_managed_homeroom};
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::AttendanceMark,
        requests::{AttendanceRecordItem, DailyAttendanceQuery, DailyAttendanceRequest},
        responses::{BulkAttendanceResponse, DailyAttendanceListResponse, StudentAttendanceItem},
    },
};
use crate::services::{current_user, storage_error_response};
use crate::utils::validate::validate_date;

/// 校验批量考勤：学生必须在允许范围内且不重复
pub(crate) fn collect_marks(
    records: Vec<AttendanceRecordItem>,
    allowed: &HashSet<i64>,
) -> Result<Vec<AttendanceMark>, String> {
    let mut seen = HashSet::new();
    let mut marks = Vec::with_capacity(records.len());
    for record in records {
        if !allowed.contains(&record.student_id) {
            return Err(format!("Student {} is not in this group", record.student_id));
        }
        if !seen.insert(record.student_id) {
            return Err(format!("Student {} appears more than once", record.student_id));
        }
        marks.push(AttendanceMark {
            student_id: record.student_id,
            status: record.status,
            note: record.note.filter(|n| !n.trim().is_empty()),
        });
    }
    Ok(marks)
}

pub async fn record_daily_attendance(
    service: &HomeroomService,
    id: i64,
    data: DailyAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let date = match validate_date(&data.date) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AttendanceRecordInvalid, msg)));
        }
    };

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_managed_homeroom(&storage, &user, id).await {
        return Ok(resp);
    }

    let students: HashSet<i64> = match storage.list_homeroom_students(id).await {
        Ok(students) => students.into_iter().map(|s| s.id).collect(),
        Err(e) => return Ok(storage_error_response("获取行政班学生失败", e)),
    };
    let marks = match collect_marks(data.records, &students) {
        Ok(marks) => marks,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::StudentNotInHomeroom, msg)));
        }
    };

    match storage.upsert_daily_attendance(id, &date, marks, user.id).await {
        Ok(updated) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            BulkAttendanceResponse { updated },
            "每日考勤记录成功",
        ))),
        Err(e) => Ok(storage_error_response("记录每日考勤失败", e)),
    }
}

pub async fn list_daily_attendance(
    service: &HomeroomService,
    id: i64,
    query: DailyAttendanceQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    // 默认为服务器本地日期
    let date = match query.date.as_deref().map(validate_date) {
        None => chrono::Local::now().date_naive(),
        Some(Ok(date)) => date,
        Some(Err(msg)) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    }
    .format("%Y-%m-%d")
    .to_string();

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_managed_homeroom(&storage, &user, id).await {
        return Ok(resp);
    }

    let students = match storage.list_homeroom_students(id).await {
        Ok(students) => students,
        Err(e) => return Ok(storage_error_response("获取行政班学生失败", e)),
    };
    let mut recorded: HashMap<i64, _> = match storage.list_daily_attendance(id, &date).await {
        Ok(rows) => rows.into_iter().map(|r| (r.student_id, r)).collect(),
        Err(e) => return Ok(storage_error_response("获取每日考勤失败", e)),
    };

    // 未记录的学生 status 为空
    let records = students
        .iter()
        .map(|student| {
            let row = recorded.remove(&student.id);
            StudentAttendanceItem {
                student: student.brief(),
                status: row.as_ref().map(|r| r.status),
                note: row.as_ref().and_then(|r| r.note.clone()),
                recorded_at: row.as_ref().map(|r| r.recorded_at),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DailyAttendanceListResponse { date, records },
        "Daily attendance retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;

    fn item(student_id: i64, status: AttendanceStatus) -> AttendanceRecordItem {
        AttendanceRecordItem {
            student_id,
            status,
            note: Some(" ".to_string()),
        }
    }

    #[test]
    fn test_collect_marks() {
        let allowed: HashSet<i64> = [1, 2].into_iter().collect();

        let marks = collect_marks(
            vec![item(1, AttendanceStatus::Hadir), item(2, AttendanceStatus::Sakit)],
            &allowed,
        )
        .unwrap();
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[1].status, AttendanceStatus::Sakit);
        assert_eq!(marks[0].note, None);

        assert!(collect_marks(vec![item(3, AttendanceStatus::Hadir)], &allowed).is_err());
        assert!(
            collect_marks(
                vec![item(1, AttendanceStatus::Hadir), item(1, AttendanceStatus::Alpa)],
                &allowed
            )
            .is_err()
        );
    }
}
