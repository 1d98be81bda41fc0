use serde::Serialize;
use ts_rs::TS;

use crate::models::attendance::entities::AttendanceTotals;
use crate::models::classes::responses::ClassDetail;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AdminClassListResponse {
    pub items: Vec<ClassDetail>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassAttendanceReport {
    pub class_id: i64,
    pub class_name: String,
    pub subject_name: String,
    pub teacher_name: String,
    pub sessions: i64,
    pub totals: AttendanceTotals,
}

// 汇总失败的班级，不影响其余班级
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct FailedClass {
    pub class_id: i64,
    pub class_name: String,
    pub reason: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AttendanceReportResponse {
    pub from: Option<String>,
    pub to: Option<String>,
    pub classes: Vec<ClassAttendanceReport>,
    pub failed_classes: Vec<FailedClass>,
}
