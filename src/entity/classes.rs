//! 课程班级实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub homeroom_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id",
        on_delete = "Restrict"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TeacherId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
    #[sea_orm(
        belongs_to = "super::homerooms::Entity",
        from = "Column::HomeroomId",
        to = "super::homerooms::Column::Id",
        on_delete = "SetNull"
    )]
    Homeroom,
    #[sea_orm(has_many = "super::class_members::Entity")]
    ClassMembers,
    #[sea_orm(has_many = "super::topics::Entity")]
    Topics,
    #[sea_orm(has_many = "super::schedules::Entity")]
    Schedules,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::homerooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Homeroom.def()
    }
}

impl Related<super::class_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassMembers.def()
    }
}

impl Related<super::topics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topics.def()
    }
}

impl Related<super::schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_class(self) -> crate::models::classes::entities::Class {
        crate::models::classes::entities::Class {
            id: self.id,
            name: self.name,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            homeroom_id: self.homeroom_id,
            description: self.description,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
