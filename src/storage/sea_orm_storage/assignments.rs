//! 作业与题目存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::question_options::{
    ActiveModel as OptionActiveModel, Column as OptionColumn, Entity as QuestionOptions,
};
use crate::entity::questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as Questions,
};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::topics::{Column as TopicColumn, Entity as Topics};
use crate::errors::{LmsError, Result};
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentKind, Question},
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    classes::entities::Class,
    dashboard::responses::UpcomingAssignment,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

/// 未指定满分时的默认值，测验固定使用该值
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

impl SeaOrmStorage {
    /// 创建作业；测验的题目与选项在同一事务中写入
    pub async fn create_assignment_impl(
        &self,
        topic_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();
        // 自动评分按百分制计分
        let max_score = match req.kind {
            AssignmentKind::Quiz => DEFAULT_MAX_SCORE,
            AssignmentKind::Essay => req.max_score.unwrap_or(DEFAULT_MAX_SCORE),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let assignment = ActiveModel {
            topic_id: Set(topic_id),
            title: Set(req.title),
            description: Set(req.description),
            kind: Set(req.kind.to_string()),
            max_score: Set(max_score),
            deadline: Set(req.deadline.map(|d| d.timestamp())),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        for (index, question) in req.questions.into_iter().enumerate() {
            let saved = QuestionActiveModel {
                assignment_id: Set(assignment.id),
                prompt: Set(question.prompt),
                order_index: Set(index as i32 + 1),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建题目失败: {e}")))?;

            for option in question.options {
                OptionActiveModel {
                    question_id: Set(saved.id),
                    label: Set(option.label),
                    is_correct: Set(option.is_correct),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("创建选项失败: {e}")))?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(assignment.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 获取作业及其所属班级（作业 -> 主题 -> 班级）
    pub async fn get_assignment_with_class_impl(
        &self,
        id: i64,
    ) -> Result<Option<(Assignment, Class)>> {
        let Some(assignment) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        let class = self.get_topic_class(assignment.topic_id).await?;
        Ok(class.map(|class| (assignment.into_assignment(), class)))
    }

    /// 主题所属的班级
    pub(crate) async fn get_topic_class(&self, topic_id: i64) -> Result<Option<Class>> {
        let result = Topics::find_by_id(topic_id)
            .find_also_related(Classes)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题班级失败: {e}")))?;

        Ok(result.and_then(|(_, class)| class).map(|c| c.into_class()))
    }

    /// 列出主题下的作业及题目数量
    pub async fn list_assignments_impl(&self, topic_id: i64) -> Result<Vec<(Assignment, i64)>> {
        let models = Assignments::find()
            .filter(Column::TopicId.eq(topic_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        if models.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let counts: Vec<(i64, i64)> = Questions::find()
            .select_only()
            .column(QuestionColumn::AssignmentId)
            .column_as(QuestionColumn::Id.count(), "question_count")
            .filter(QuestionColumn::AssignmentId.is_in(ids))
            .group_by(QuestionColumn::AssignmentId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计题目数量失败: {e}")))?;
        let counts: HashMap<i64, i64> = counts.into_iter().collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let count = counts.get(&m.id).copied().unwrap_or(0);
                (m.into_assignment(), count)
            })
            .collect())
    }

    /// 列出作业题目及选项；reveal 为 false 时隐藏正确答案
    pub async fn list_questions_impl(
        &self,
        assignment_id: i64,
        reveal: bool,
    ) -> Result<Vec<Question>> {
        let questions = Questions::find()
            .filter(QuestionColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(QuestionColumn::OrderIndex)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询题目失败: {e}")))?;

        if questions.is_empty() {
            return Ok(vec![]);
        }

        let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let options = QuestionOptions::find()
            .filter(OptionColumn::QuestionId.is_in(question_ids))
            .order_by_asc(OptionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询选项失败: {e}")))?;

        let mut grouped: HashMap<i64, Vec<_>> = HashMap::new();
        for option in options {
            grouped.entry(option.question_id).or_default().push(option);
        }

        Ok(questions
            .into_iter()
            .map(|q| {
                let options = grouped.remove(&q.id).unwrap_or_default();
                q.into_question(options, reveal)
            })
            .collect())
    }

    /// 更新作业标题、说明和截止时间
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        if update.clear_deadline {
            model.deadline = Set(None);
        } else if let Some(deadline) = update.deadline {
            model.deadline = Set(Some(deadline.timestamp()));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(Some(result.into_assignment()))
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生尚未提交且未过截止时间的作业，按截止时间排序（无截止时间的排在最后）
    pub async fn list_upcoming_assignments_impl(
        &self,
        student_id: i64,
        now: i64,
    ) -> Result<Vec<UpcomingAssignment>> {
        let class_ids = self.list_student_class_ids_impl(student_id).await?;
        if class_ids.is_empty() {
            return Ok(vec![]);
        }

        let classes: HashMap<i64, String> = Classes::find()
            .filter(ClassColumn::Id.is_in(class_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let topics: HashMap<i64, i64> = Topics::find()
            .select_only()
            .column(TopicColumn::Id)
            .column(TopicColumn::ClassId)
            .filter(TopicColumn::ClassId.is_in(class_ids))
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题失败: {e}")))?
            .into_iter()
            .collect();

        if topics.is_empty() {
            return Ok(vec![]);
        }

        let models = Assignments::find()
            .filter(Column::TopicId.is_in(topics.keys().copied().collect::<Vec<_>>()))
            .filter(
                Condition::any()
                    .add(Column::Deadline.is_null())
                    .add(Column::Deadline.gt(now)),
            )
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        let submitted: HashSet<i64> = Submissions::find()
            .select_only()
            .column(SubmissionColumn::AssignmentId)
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交记录失败: {e}")))?
            .into_iter()
            .collect();

        let mut upcoming: Vec<UpcomingAssignment> = models
            .into_iter()
            .filter(|m| !submitted.contains(&m.id))
            .filter_map(|m| {
                let class_id = *topics.get(&m.topic_id)?;
                let class_name = classes.get(&class_id).cloned().unwrap_or_default();
                Some(UpcomingAssignment {
                    assignment: m.into_assignment(),
                    class_id,
                    class_name,
                })
            })
            .collect();

        upcoming.sort_by_key(|u| (u.assignment.deadline.is_none(), u.assignment.deadline));
        Ok(upcoming)
    }
}
