use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,     // 管理员
    Guru,      // 教师
    Siswa,     // 学生
    WaliKelas, // 班主任（同时具备教师身份）
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const GURU: &'static str = "guru";
    pub const SISWA: &'static str = "siswa";
    pub const WALI_KELAS: &'static str = "wali_kelas";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// 可以执教课程班级的角色（含管理员）
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Guru, &Self::WaliKelas, &Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Siswa]
    }
    pub fn homeroom_roles() -> &'static [&'static UserRole] {
        &[&Self::WaliKelas, &Self::Admin]
    }

    /// 是否为教师（guru 或 wali_kelas）
    pub fn is_teacher(&self) -> bool {
        matches!(self, UserRole::Guru | UserRole::WaliKelas)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn is_student(&self) -> bool {
        matches!(self, UserRole::Siswa)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, guru, siswa, wali_kelas"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Guru => write!(f, "{}", UserRole::GURU),
            UserRole::Siswa => write!(f, "{}", UserRole::SISWA),
            UserRole::WaliKelas => write!(f, "{}", UserRole::WALI_KELAS),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::GURU => Ok(UserRole::Guru),
            UserRole::SISWA => Ok(UserRole::Siswa),
            UserRole::WALI_KELAS => Ok(UserRole::WaliKelas),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

define_string_enum! {
    // 用户状态
    UserStatus("../frontend/src/types/generated/user.ts") {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub status: UserStatus,
    /// 学号（NIS）或工号（NIP）
    pub nis_nip: Option<String>,
    pub homeroom_id: Option<i64>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.role.to_string(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }

    /// 用户精简信息
    pub fn brief(&self) -> UserBrief {
        UserBrief {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            nis_nip: self.nis_nip.clone(),
        }
    }
}

// 用户精简信息，用于列表中嵌套展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserBrief {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub nis_nip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("wali_kelas".parse::<UserRole>(), Ok(UserRole::WaliKelas));
        assert_eq!(" Guru ".parse::<UserRole>(), Ok(UserRole::Guru));
        assert!("teacher".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Siswa.to_string(), "siswa");
    }

    #[test]
    fn test_role_deserialize_error_message() {
        let err = serde_json::from_str::<UserRole>(r#""root""#).unwrap_err();
        assert!(err.to_string().contains("无效的用户角色"));
        let role: UserRole = serde_json::from_str(r#""wali_kelas""#).unwrap();
        assert_eq!(role, UserRole::WaliKelas);
    }

    #[test]
    fn test_wali_kelas_is_teacher() {
        assert!(UserRole::WaliKelas.is_teacher());
        assert!(UserRole::Guru.is_teacher());
        assert!(!UserRole::Admin.is_teacher());
        assert!(UserRole::teacher_roles().contains(&&UserRole::WaliKelas));
    }

    #[test]
    fn test_status_roundtrip_strings() {
        assert_eq!(UserStatus::Suspended.as_str(), "suspended");
        assert_eq!("inactive".parse::<UserStatus>(), Ok(UserStatus::Inactive));
        assert_eq!(
            serde_json::to_string(&UserStatus::Active).unwrap(),
            r#""active""#
        );
    }
}
