//! 行政班考勤汇总
//!
//! 每日考勤（科目列为 `Harian`）与网课考勤拼接后按（科目，第 n 次课）透视。
//! 每个科目的课次按时间顺序从 1 开始编号。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeMap, HashMap};

use super::grades::sort_students;
use super::{HomeroomService, load_managed_homeroom};
use crate::models::{
    ApiResponse,
    attendance::entities::AttendanceTotals,
    homerooms::{
        entities::{AttendanceEntry, DAILY_ATTENDANCE_SUBJECT},
        responses::{AttendanceColumn, AttendanceRecapResponse, StudentAttendanceRow},
    },
    users::entities::User,
};
use crate::services::{current_user, storage_error_response};

pub fn build_attendance_recap(
    mut students: Vec<User>,
    entries: &[AttendanceEntry],
) -> AttendanceRecapResponse {
    sort_students(&mut students);

    // 科目 -> 课次 (时间, ID) -> 标签；BTreeMap 保证课次按时间排序
    let mut meetings: BTreeMap<&str, BTreeMap<(i64, i64), &str>> = BTreeMap::new();
    for entry in entries {
        meetings
            .entry(entry.subject.as_str())
            .or_default()
            .entry((entry.meeting_at, entry.meeting_id))
            .or_insert(entry.label.as_str());
    }

    // 每日考勤列在最前，其余科目按名称排序
    let mut subjects: Vec<&str> = meetings.keys().copied().collect();
    subjects.sort_by_key(|s| (*s != DAILY_ATTENDANCE_SUBJECT, *s));

    let mut columns = Vec::new();
    let mut column_index: HashMap<(&str, i64), usize> = HashMap::new();
    for subject in subjects {
        for (n, ((_, meeting_id), label)) in meetings[subject].iter().enumerate() {
            column_index.insert((subject, *meeting_id), columns.len());
            columns.push(AttendanceColumn {
                subject: subject.to_string(),
                meeting: n + 1,
                label: label.to_string(),
            });
        }
    }

    let row_index: HashMap<i64, usize> = students
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id, i))
        .collect();
    let mut cells = vec![vec![None; columns.len()]; students.len()];
    for entry in entries {
        if let (Some(row), Some(col)) = (
            row_index.get(&entry.student_id),
            column_index.get(&(entry.subject.as_str(), entry.meeting_id)),
        ) {
            cells[*row][*col] = Some(entry.status);
        }
    }

    let rows = students
        .iter()
        .zip(cells)
        .map(|(student, cells)| {
            let totals: AttendanceTotals = cells.iter().flatten().copied().collect();
            StudentAttendanceRow {
                student: student.brief(),
                cells,
                totals,
            }
        })
        .collect();

    AttendanceRecapResponse {
        columns,
        students: rows,
    }
}

pub async fn attendance_recap(
    service: &HomeroomService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed_homeroom(&storage, &user, id).await {
        return Ok(resp);
    }

    let students = match storage.list_homeroom_students(id).await {
        Ok(students) => students,
        Err(e) => return Ok(storage_error_response("获取行政班学生失败", e)),
    };
    let entries = match storage.list_attendance_entries(id).await {
        Ok(entries) => entries,
        Err(e) => return Ok(storage_error_response("获取考勤记录失败", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        build_attendance_recap(students, &entries),
        "Attendance recap retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn student(id: i64, name: &str) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("s{id}"),
            email: None,
            password_hash: String::new(),
            full_name: name.to_string(),
            role: UserRole::Siswa,
            status: UserStatus::Active,
            nis_nip: None,
            homeroom_id: Some(1),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(
        subject: &str,
        meeting_at: i64,
        meeting_id: i64,
        student_id: i64,
        status: AttendanceStatus,
    ) -> AttendanceEntry {
        AttendanceEntry {
            subject: subject.to_string(),
            meeting_at,
            meeting_id,
            label: format!("{subject}-{meeting_id}"),
            student_id,
            status,
        }
    }

    #[test]
    fn test_meetings_numbered_chronologically_per_subject() {
        use AttendanceStatus::*;
        let students = vec![student(2, "Budi"), student(1, "Ani")];
        let entries = vec![
            // 网课：场次 9 早于场次 5
            entry("Matematika", 2_000, 5, 1, Hadir),
            entry("Matematika", 1_000, 9, 1, Izin),
            entry("Matematika", 1_000, 9, 2, Alpa),
            // 每日考勤
            entry(DAILY_ATTENDANCE_SUBJECT, 86_400, 1, 1, Hadir),
            entry(DAILY_ATTENDANCE_SUBJECT, 0, 0, 2, Sakit),
            // 不属于行政班的学生被忽略
            entry("Biologi", 500, 3, 99, Hadir),
        ];

        let recap = build_attendance_recap(students, &entries);

        let headers: Vec<(String, usize)> = recap
            .columns
            .iter()
            .map(|c| (c.subject.clone(), c.meeting))
            .collect();
        assert_eq!(
            headers,
            vec![
                ("Harian".to_string(), 1),
                ("Harian".to_string(), 2),
                ("Biologi".to_string(), 1),
                ("Matematika".to_string(), 1),
                ("Matematika".to_string(), 2),
            ]
        );
        assert_eq!(recap.columns[3].label, "Matematika-9");

        // Ani
        let ani = &recap.students[0];
        assert_eq!(ani.student.full_name, "Ani");
        assert_eq!(
            ani.cells,
            vec![None, Some(Hadir), None, Some(Izin), Some(Hadir)]
        );
        assert_eq!(ani.totals.hadir, 2);
        assert_eq!(ani.totals.izin, 1);

        // Budi
        let budi = &recap.students[1];
        assert_eq!(budi.cells, vec![Some(Sakit), None, None, Some(Alpa), None]);
        assert_eq!(budi.totals.total(), 2);
    }
}
