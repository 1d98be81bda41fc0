use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct CreateTopicRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct UpdateTopicRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/topic.ts")]
pub struct CreateMaterialRequest {
    pub title: String,
    pub content: Option<String>,
    pub link_url: Option<String>,
}
