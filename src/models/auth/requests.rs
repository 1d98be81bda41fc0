use serde::Deserialize;
use ts_rs::TS;

// 登录请求，username 也可以填邮箱
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// 为 true 时 refresh token 使用更长的有效期
    #[serde(default)]
    pub remember_me: bool,
}
