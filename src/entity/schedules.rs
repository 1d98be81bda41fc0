//! 课表实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    /// 1 = 周一 ... 7 = 周日
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id",
        on_delete = "Cascade"
    )]
    Class,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule(self) -> crate::models::schedules::entities::Schedule {
        crate::models::schedules::entities::Schedule {
            id: self.id,
            class_id: self.class_id,
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            room: self.room,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
