use serde::Serialize;
use ts_rs::TS;

use super::entities::Schedule;

// 课表条目（含班级、科目和教师）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub schedule: Schedule,
    pub class_name: String,
    pub subject_name: String,
    pub teacher_id: i64,
    pub teacher_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleResponse {
    pub schedule: Schedule,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleListResponse {
    pub items: Vec<ScheduleEntry>,
}
