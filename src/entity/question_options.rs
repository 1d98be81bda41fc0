//! 题目选项实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "question_options")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub question_id: i64,
    #[sea_orm(column_type = "Text")]
    pub label: String,
    pub is_correct: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id",
        on_delete = "Cascade"
    )]
    Question,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_option(self, reveal: bool) -> crate::models::assignments::entities::QuestionOption {
        crate::models::assignments::entities::QuestionOption {
            id: self.id,
            question_id: self.question_id,
            label: self.label,
            is_correct: reveal.then_some(self.is_correct),
        }
    }
}
