//! 学生备注实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub homeroom_id: i64,
    pub student_id: i64,
    pub author_id: i64,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::homerooms::Entity",
        from = "Column::HomeroomId",
        to = "super::homerooms::Column::Id",
        on_delete = "Cascade"
    )]
    Homeroom,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::homerooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Homeroom.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_note(self) -> crate::models::homerooms::entities::StudentNote {
        use crate::models::homerooms::entities::{NoteCategory, StudentNote};

        StudentNote {
            id: self.id,
            homeroom_id: self.homeroom_id,
            student_id: self.student_id,
            author_id: self.author_id,
            category: self
                .category
                .parse::<NoteCategory>()
                .unwrap_or(NoteCategory::Lainnya),
            content: self.content,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
