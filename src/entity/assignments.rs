//! 作业实体

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub topic_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub kind: String,
    #[sea_orm(column_type = "Double")]
    pub max_score: f64,
    pub deadline: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
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
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::topics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topic.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::{Assignment, AssignmentKind};

        Assignment {
            id: self.id,
            topic_id: self.topic_id,
            title: self.title,
            description: self.description,
            kind: self
                .kind
                .parse::<AssignmentKind>()
                .unwrap_or(AssignmentKind::Essay),
            max_score: self.max_score,
            deadline: self.deadline.map(to_datetime),
            created_by: self.created_by,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
