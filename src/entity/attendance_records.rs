//! 在线考勤记录实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub recorded_by: Option<i64>,
    pub recorded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_sessions::Entity",
        from = "Column::SessionId",
        to = "super::attendance_sessions::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::attendance_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::models::attendance::entities::AttendanceRecord {
        use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus};

        AttendanceRecord {
            id: self.id,
            session_id: self.session_id,
            student_id: self.student_id,
            status: self
                .status
                .parse::<AttendanceStatus>()
                .unwrap_or(AttendanceStatus::Alpa),
            note: self.note,
            recorded_by: self.recorded_by,
            recorded_at: to_datetime(self.recorded_at),
        }
    }
}
