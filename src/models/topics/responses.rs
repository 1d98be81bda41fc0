use serde::Serialize;
use ts_rs::TS;

use super::entities::{Material, Topic};
use crate::models::assignments::entities::Assignment;
use crate::models::attendance::entities::AttendanceSession;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct TopicResponse {
    pub topic: Topic,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct TopicListResponse {
    pub items: Vec<Topic>,
}

// 主题详情：材料、作业和考勤场次
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct TopicDetailResponse {
    pub topic: Topic,
    pub materials: Vec<Material>,
    pub assignments: Vec<Assignment>,
    pub attendance_sessions: Vec<AttendanceSession>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct MaterialResponse {
    pub material: Material,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct MaterialListResponse {
    pub items: Vec<Material>,
}
