use super::entities::{UserRole, UserStatus};
use crate::models::common::{PaginationQuery, pagination::deserialize_option_string_to_i64};
use serde::Deserialize;
use ts_rs::TS;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "deserialize_option_string_to_i64")]
    pub homeroom_id: Option<i64>,
    pub search: Option<String>,
}

// 用户创建请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
    /// 服务层在写入存储前替换为哈希值
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
    pub nis_nip: Option<String>,
    pub homeroom_id: Option<i64>,
}

// 用户更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub nis_nip: Option<String>,
}

// 修改密码请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub homeroom_id: Option<i64>,
    pub search: Option<String>,
}
