use serde::Deserialize;
use ts_rs::TS;

use super::entities::Audience;
use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    #[serde(default = "default_audience")]
    pub audience: Audience,
    pub class_id: Option<i64>,
}

fn default_audience() -> Audience {
    Audience::All
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub audience: Option<Audience>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}

/// 存储层可见性过滤：全局公告按受众过滤，班级公告按班级过滤
#[derive(Debug, Clone, Default)]
pub struct AnnouncementVisibility {
    pub audiences: Vec<Audience>,
    pub class_ids: Vec<i64>,
    /// 管理员可见全部班级公告
    pub all_classes: bool,
}
