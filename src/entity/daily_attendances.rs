//! 每日考勤实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub homeroom_id: i64,
    pub student_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub recorded_by: i64,
    pub recorded_at: i64,
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
    pub fn into_daily_attendance(self) -> crate::models::attendance::entities::DailyAttendance {
        use crate::models::attendance::entities::{AttendanceStatus, DailyAttendance};

        DailyAttendance {
            id: self.id,
            homeroom_id: self.homeroom_id,
            student_id: self.student_id,
            date: self.date,
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
