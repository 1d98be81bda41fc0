use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

define_string_enum! {
    // 公告受众
    Audience("../frontend/src/types/generated/announcement.ts") {
        All => "all",
        Guru => "guru",
        Siswa => "siswa",
    }
}

impl Audience {
    /// 某角色能看到的全局公告受众；班主任按教师处理，管理员可见全部
    pub fn visible_to(role: UserRole) -> &'static [Audience] {
        match role {
            UserRole::Admin => Audience::ALL,
            UserRole::Guru | UserRole::WaliKelas => &[Audience::All, Audience::Guru],
            UserRole::Siswa => &[Audience::All, Audience::Siswa],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub author_id: i64,
    /// 为空时为全局公告
    pub class_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub audience: Audience,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_by_role() {
        assert_eq!(
            Audience::visible_to(UserRole::WaliKelas),
            &[Audience::All, Audience::Guru]
        );
        assert!(!Audience::visible_to(UserRole::Siswa).contains(&Audience::Guru));
        assert_eq!(Audience::visible_to(UserRole::Admin).len(), 3);
    }
}
