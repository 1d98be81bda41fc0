use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 主题（单元），班级内按 order_index 排序
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct Topic {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 学习材料：内联文本或外部链接
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct Material {
    pub id: i64,
    pub topic_id: i64,
    pub title: String,
    pub content: Option<String>,
    pub link_url: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
