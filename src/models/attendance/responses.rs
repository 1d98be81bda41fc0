use serde::Serialize;
use ts_rs::TS;

use super::entities::{AttendanceRecord, AttendanceSession, AttendanceStatus};
use crate::models::users::entities::UserBrief;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionResponse {
    pub session: AttendanceSession,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionListResponse {
    pub items: Vec<AttendanceSession>,
}

// 场次中每名学生的考勤，未记录时 status 为空
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentAttendanceItem {
    pub student: UserBrief,
    pub status: Option<AttendanceStatus>,
    pub note: Option<String>,
    pub recorded_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionDetailResponse {
    pub session: AttendanceSession,
    pub class_id: i64,
    pub records: Vec<StudentAttendanceItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CheckInResponse {
    pub record: AttendanceRecord,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkAttendanceResponse {
    pub updated: usize,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct DailyAttendanceListResponse {
    pub date: String,
    pub records: Vec<StudentAttendanceItem>,
}
