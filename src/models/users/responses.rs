use super::entities::User;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 用户响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub user: User,
}

// 用户列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

// 批量导入中单行的错误
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct ImportRowError {
    /// CSV 中的行号（表头为第 1 行）
    pub row: usize,
    pub username: Option<String>,
    pub reason: String,
}

// 批量导入结果
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserImportResponse {
    pub total: usize,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}
