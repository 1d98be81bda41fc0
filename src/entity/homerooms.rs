//! 行政班实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "homerooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub grade_level: i32,
    pub academic_year: String,
    #[sea_orm(unique)]
    pub homeroom_teacher_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_homeroom(self) -> crate::models::homerooms::entities::Homeroom {
        crate::models::homerooms::entities::Homeroom {
            id: self.id,
            name: self.name,
            grade_level: self.grade_level,
            academic_year: self.academic_year,
            homeroom_teacher_id: self.homeroom_teacher_id,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
