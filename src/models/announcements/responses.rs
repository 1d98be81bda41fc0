use serde::Serialize;
use ts_rs::TS;

use super::entities::Announcement;
use crate::models::common::PaginationInfo;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub announcement: Announcement,
    pub author_name: String,
    pub class_name: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementResponse {
    pub announcement: Announcement,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListResponse {
    pub items: Vec<AnnouncementItem>,
    pub pagination: PaginationInfo,
}
