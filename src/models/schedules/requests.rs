use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct CreateScheduleRequest {
    pub class_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct UpdateScheduleRequest {
    pub class_id: Option<i64>,
    pub day_of_week: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct ScheduleListQuery {
    pub class_id: Option<i64>,
    pub homeroom_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub day: Option<i32>,
}
