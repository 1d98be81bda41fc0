//! 用户实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub full_name: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub nis_nip: Option<String>,
    pub homeroom_id: Option<i64>,
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homerooms::Entity",
        from = "Column::HomeroomId",
        to = "super::homerooms::Column::Id",
        on_delete = "SetNull"
    )]
    Homeroom,
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
    #[sea_orm(has_many = "super::class_members::Entity")]
    ClassMembers,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::homerooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Homeroom.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl Related<super::class_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassMembers.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{User, UserRole, UserStatus};

        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Siswa),
            status: self
                .status
                .parse::<UserStatus>()
                .unwrap_or(UserStatus::Active),
            nis_nip: self.nis_nip,
            homeroom_id: self.homeroom_id,
            last_login: self.last_login.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
