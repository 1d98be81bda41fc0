//! 提交与答题记录存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::submission_answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as SubmissionAnswers,
};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::topics::{Column as TopicColumn, Entity as Topics};
use crate::entity::users::Entity as Users;
use crate::errors::{LmsError, Result};
use crate::models::{
    assignments::{
        entities::{NewSubmission, Submission, SubmissionAnswer, SubmissionStatus},
        responses::SubmissionListItem,
    },
    dashboard::responses::PendingSubmission,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建提交；测验的逐题判分结果在同一事务中写入
    ///
    /// 同一学生对同一作业的重复提交由唯一索引拦截，返回 Conflict。
    pub async fn create_submission_impl(&self, new: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let graded_at = (new.status == SubmissionStatus::Graded).then_some(now);
        let submission = ActiveModel {
            assignment_id: Set(new.assignment_id),
            student_id: Set(new.student_id),
            content: Set(new.content),
            status: Set(new.status.to_string()),
            score: Set(new.score),
            feedback: Set(None),
            is_late: Set(new.is_late),
            submitted_at: Set(now),
            graded_at: Set(graded_at),
            graded_by: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::from_db("创建提交失败", e))?;

        for answer in new.answers {
            AnswerActiveModel {
                submission_id: Set(submission.id),
                question_id: Set(answer.question_id),
                option_id: Set(answer.option_id),
                is_correct: Set(answer.is_correct),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("保存答题记录失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(submission.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 学生对某作业的提交
    pub async fn get_student_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 学生在一组作业上的提交
    pub async fn list_student_submissions_impl(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(vec![]);
        }

        let models = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AssignmentId.is_in(assignment_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn list_submission_answers_impl(
        &self,
        submission_id: i64,
    ) -> Result<Vec<SubmissionAnswer>> {
        let models = SubmissionAnswers::find()
            .filter(AnswerColumn::SubmissionId.eq(submission_id))
            .order_by_asc(AnswerColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询答题记录失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_answer()).collect())
    }

    /// 列出作业的全部提交及学生信息
    pub async fn list_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionListItem>> {
        let rows = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .find_also_related(Users)
            .order_by_asc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(submission, user)| {
                Some(SubmissionListItem {
                    student: user?.into_user().brief(),
                    submission: submission.into_submission(),
                })
            })
            .collect())
    }

    /// 批改提交
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        if self.get_submission_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            score: Set(Some(score)),
            feedback: Set(feedback),
            status: Set(SubmissionStatus::Graded.to_string()),
            graded_at: Set(Some(chrono::Utc::now().timestamp())),
            graded_by: Set(Some(graded_by)),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("批改提交失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }

    /// 教师所教班级中待批改的提交，按提交时间排序
    pub async fn list_pending_submissions_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<PendingSubmission>> {
        let classes: HashMap<i64, String> = Classes::find()
            .filter(ClassColumn::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级失败: {e}")))?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        if classes.is_empty() {
            return Ok(vec![]);
        }

        let topics: HashMap<i64, i64> = Topics::find()
            .select_only()
            .column(TopicColumn::Id)
            .column(TopicColumn::ClassId)
            .filter(TopicColumn::ClassId.is_in(classes.keys().copied().collect::<Vec<_>>()))
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题失败: {e}")))?
            .into_iter()
            .collect();
        if topics.is_empty() {
            return Ok(vec![]);
        }

        let assignments: HashMap<i64, (String, i64)> = Assignments::find()
            .filter(AssignmentColumn::TopicId.is_in(topics.keys().copied().collect::<Vec<_>>()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
            .into_iter()
            .filter_map(|a| topics.get(&a.topic_id).map(|&c| (a.id, (a.title, c))))
            .collect();
        if assignments.is_empty() {
            return Ok(vec![]);
        }

        let rows = Submissions::find()
            .filter(Column::AssignmentId.is_in(assignments.keys().copied().collect::<Vec<_>>()))
            .filter(Column::Status.eq(SubmissionStatus::Submitted.as_str()))
            .find_also_related(Users)
            .order_by_asc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询待批改提交失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(submission, user)| {
                let (title, class_id) = assignments.get(&submission.assignment_id)?;
                Some(PendingSubmission {
                    submission_id: submission.id,
                    assignment_id: submission.assignment_id,
                    assignment_title: title.clone(),
                    class_id: *class_id,
                    class_name: classes.get(class_id).cloned().unwrap_or_default(),
                    student: user?.into_user().brief(),
                    submitted_at: crate::entity::to_datetime(submission.submitted_at),
                })
            })
            .collect())
    }
}
