//! 测验题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    pub order_index: i32,
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
    #[sea_orm(has_many = "super::question_options::Entity")]
    Options,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::question_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 组装题目及其选项；`reveal` 为 false 时隐藏正确答案
    pub fn into_question(
        self,
        options: Vec<super::question_options::Model>,
        reveal: bool,
    ) -> crate::models::assignments::entities::Question {
        crate::models::assignments::entities::Question {
            id: self.id,
            assignment_id: self.assignment_id,
            prompt: self.prompt,
            order_index: self.order_index,
            options: options
                .into_iter()
                .map(|o| o.into_option(reveal))
                .collect(),
        }
    }
}
