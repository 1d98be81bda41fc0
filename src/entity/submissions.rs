//! 提交实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub is_late: bool,
    pub submitted_at: i64,
    pub graded_at: Option<i64>,
    pub graded_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id",
        on_delete = "Cascade"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(has_many = "super::submission_answers::Entity")]
    Answers,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::submission_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::assignments::entities::Submission {
        use crate::models::assignments::entities::{Submission, SubmissionStatus};

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            content: self.content,
            status: self
                .status
                .parse::<SubmissionStatus>()
                .unwrap_or(SubmissionStatus::Submitted),
            score: self.score,
            feedback: self.feedback,
            is_late: self.is_late,
            submitted_at: to_datetime(self.submitted_at),
            graded_at: self.graded_at.map(to_datetime),
            graded_by: self.graded_by,
        }
    }
}
