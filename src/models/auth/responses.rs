use crate::models::users::entities::User;
use serde::Serialize;
use ts_rs::TS;

// 登录成功，refresh token 另行写入 http-only cookie
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// access token 有效秒数
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}
