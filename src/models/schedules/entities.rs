use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 每周课表条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/schedule.ts")]
pub struct Schedule {
    pub id: i64,
    pub class_id: i64,
    /// 1 = 周一 … 7 = 周日
    pub day_of_week: i32,
    /// HH:MM
    pub start_time: String,
    /// HH:MM
    pub end_time: String,
    pub room: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
