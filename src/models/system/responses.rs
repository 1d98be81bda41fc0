use serde::Serialize;
use ts_rs::TS;

use super::entities::SystemSetting;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSettingsResponse {
    pub system_name: String,   // 系统名称
    pub school_name: String,   // 学校名称
    pub academic_year: String, // 当前学年
    pub semester: String,      // 当前学期
    pub environment: String,   // 运行环境
    pub settings: Vec<SystemSetting>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingsUpdateResponse {
    pub settings: Vec<SystemSetting>,
}
