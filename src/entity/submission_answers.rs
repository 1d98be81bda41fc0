//! 答题记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submission_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    pub option_id: Option<i64>,
    pub is_correct: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id",
        on_delete = "Cascade"
    )]
    Submission,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::models::assignments::entities::SubmissionAnswer {
        crate::models::assignments::entities::SubmissionAnswer {
            id: self.id,
            submission_id: self.submission_id,
            question_id: self.question_id,
            option_id: self.option_id,
            is_correct: self.is_correct,
        }
    }
}
