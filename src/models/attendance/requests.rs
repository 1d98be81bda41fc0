use serde::Deserialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CreateSessionRequest {
    pub title: String,
    pub opens_at: chrono::DateTime<chrono::Utc>,
    pub closes_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecordItem {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

// 教师批量记录（覆盖）网课考勤
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct BulkAttendanceRequest {
    pub records: Vec<AttendanceRecordItem>,
}

// 班主任记录每日考勤
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct DailyAttendanceRequest {
    pub date: String,
    pub records: Vec<AttendanceRecordItem>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct DailyAttendanceQuery {
    pub date: Option<String>,
}
