//! 在线考勤场次实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub topic_id: i64,
    pub title: String,
    pub opens_at: i64,
    pub closes_at: i64,
    pub created_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::topics::Entity",
        from = "Column::TopicId",
        to = "super::topics::Column::Id",
        on_delete = "Cascade"
    )]
    Topic,
    #[sea_orm(has_many = "super::attendance_records::Entity")]
    Records,
}

impl Related<super::topics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topic.def()
    }
}

impl Related<super::attendance_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_session(self) -> crate::models::attendance::entities::AttendanceSession {
        crate::models::attendance::entities::AttendanceSession {
            id: self.id,
            topic_id: self.topic_id,
            title: self.title,
            opens_at: to_datetime(self.opens_at),
            closes_at: to_datetime(self.closes_at),
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
        }
    }
}
