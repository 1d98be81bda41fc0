//! 公告实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub author_id: i64,
    /// 为空表示全校公告
    pub class_id: Option<i64>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub audience: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id",
        on_delete = "Cascade"
    )]
    Class,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_announcement(self) -> crate::models::announcements::entities::Announcement {
        use crate::models::announcements::entities::{Announcement, Audience};

        Announcement {
            id: self.id,
            author_id: self.author_id,
            class_id: self.class_id,
            title: self.title,
            content: self.content,
            audience: self.audience.parse::<Audience>().unwrap_or(Audience::All),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
