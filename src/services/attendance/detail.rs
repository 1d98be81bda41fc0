use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::{AttendanceService, load_session};
use crate::middlewares::ClassAccess;
use crate::models::{
    ApiResponse,
    attendance::{
        entities::AttendanceRecord,
        responses::{SessionDetailResponse, StudentAttendanceItem},
    },
    classes::responses::ClassMemberItem,
};
use crate::services::{current_user, storage_error_response};

/// 每名成员一行，未记录的状态为空
pub(crate) fn merge_records(
    members: Vec<ClassMemberItem>,
    records: Vec<AttendanceRecord>,
) -> Vec<StudentAttendanceItem> {
    let mut by_student: HashMap<i64, AttendanceRecord> =
        records.into_iter().map(|r| (r.student_id, r)).collect();
    members
        .into_iter()
        .map(|member| {
            let record = by_student.remove(&member.student.id);
            StudentAttendanceItem {
                student: member.student,
                status: record.as_ref().map(|r| r.status),
                note: record.as_ref().and_then(|r| r.note.clone()),
                recorded_at: record.map(|r| r.recorded_at),
            }
        })
        .collect()
}

pub async fn get_session(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let (session, class, access) = match load_session(&storage, &user, session_id, true).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };

    let mut members = match storage.list_class_members(class.id).await {
        Ok(members) => members,
        Err(e) => return Ok(storage_error_response("获取班级成员失败", e)),
    };
    // 学生只看到自己的记录
    if access == ClassAccess::Student {
        members.retain(|m| m.student.id == user.id);
    }

    let records = match storage.list_session_records(session.id).await {
        Ok(records) => records,
        Err(e) => return Ok(storage_error_response("获取考勤记录失败", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SessionDetailResponse {
            session,
            class_id: class.id,
            records: merge_records(members, records),
        },
        "Attendance session retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{attendance::entities::AttendanceStatus, users::entities::UserBrief};
    use chrono::Utc;

    fn member(id: i64) -> ClassMemberItem {
        ClassMemberItem {
            member_id: id * 10,
            joined_at: Utc::now(),
            homeroom_id: None,
            student: UserBrief {
                id,
                username: format!("siswa{id}"),
                full_name: format!("Siswa {id}"),
                nis_nip: None,
            },
        }
    }

    #[test]
    fn test_missing_records_are_null() {
        let record = AttendanceRecord {
            id: 1,
            session_id: 7,
            student_id: 2,
            status: AttendanceStatus::Sakit,
            note: Some("Demam".to_string()),
            recorded_by: Some(99),
            recorded_at: Utc::now(),
        };
        let items = merge_records(vec![member(1), member(2)], vec![record]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].status, None);
        assert_eq!(items[1].status, Some(AttendanceStatus::Sakit));
        assert_eq!(items[1].note.as_deref(), Some("Demam"));
    }
}
