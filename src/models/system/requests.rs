use serde::Deserialize;
use ts_rs::TS;

/// 批量更新配置请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct UpdateSettingsRequest {
    pub settings: Vec<UpdateSettingItem>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct UpdateSettingItem {
    pub key: String,
    pub value: String,
}
