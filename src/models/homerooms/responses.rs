use serde::Serialize;
use ts_rs::TS;

use super::entities::{Homeroom, StudentNote};
use crate::models::attendance::entities::{AttendanceStatus, AttendanceTotals};
use crate::models::common::PaginationInfo;
use crate::models::users::entities::{User, UserBrief};

// 行政班详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct HomeroomDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub homeroom: Homeroom,
    pub homeroom_teacher: Option<UserBrief>,
    pub student_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct HomeroomResponse {
    pub homeroom: HomeroomDetail,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct HomeroomListResponse {
    pub items: Vec<HomeroomDetail>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct HomeroomStudentsResponse {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct AssignStudentsResponse {
    pub assigned: usize,
}

// 成绩汇总：每行一名学生，grades 与 subjects 一一对应
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct StudentGradeRow {
    pub student: UserBrief,
    pub grades: Vec<Option<f64>>,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct GradeRecapResponse {
    pub subjects: Vec<String>,
    pub students: Vec<StudentGradeRow>,
}

// 考勤汇总的列：科目 + 第 n 次课
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct AttendanceColumn {
    pub subject: String,
    pub meeting: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct StudentAttendanceRow {
    pub student: UserBrief,
    pub cells: Vec<Option<AttendanceStatus>>,
    pub totals: AttendanceTotals,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct AttendanceRecapResponse {
    pub columns: Vec<AttendanceColumn>,
    pub students: Vec<StudentAttendanceRow>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct NoteResponse {
    pub note: StudentNote,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct NoteListResponse {
    pub items: Vec<StudentNote>,
}
