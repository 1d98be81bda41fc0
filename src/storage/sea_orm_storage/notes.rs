//! 班主任学生备注存储操作

use super::SeaOrmStorage;
use crate::entity::student_notes::{ActiveModel, Column, Entity as StudentNotes};
use crate::errors::{LmsError, Result};
use crate::models::homerooms::{
    entities::StudentNote,
    requests::{CreateNoteRequest, UpdateNoteRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_note_impl(
        &self,
        homeroom_id: i64,
        author_id: i64,
        req: CreateNoteRequest,
    ) -> Result<StudentNote> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            homeroom_id: Set(homeroom_id),
            student_id: Set(req.student_id),
            author_id: Set(author_id),
            category: Set(req.category.to_string()),
            content: Set(req.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建备注失败: {e}")))?;

        Ok(result.into_note())
    }

    pub async fn get_note_by_id_impl(&self, id: i64) -> Result<Option<StudentNote>> {
        let result = StudentNotes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询备注失败: {e}")))?;

        Ok(result.map(|m| m.into_note()))
    }

    /// 列出行政班备注，最新的在前
    pub async fn list_notes_impl(
        &self,
        homeroom_id: i64,
        student_id: Option<i64>,
    ) -> Result<Vec<StudentNote>> {
        let mut select = StudentNotes::find().filter(Column::HomeroomId.eq(homeroom_id));
        if let Some(student_id) = student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let models = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询备注失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_note()).collect())
    }

    pub async fn update_note_impl(
        &self,
        id: i64,
        update: UpdateNoteRequest,
    ) -> Result<Option<StudentNote>> {
        let Some(existing) = StudentNotes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询备注失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(category) = update.category {
            model.category = Set(category.to_string());
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新备注失败: {e}")))?;

        Ok(Some(result.into_note()))
    }

    pub async fn delete_note_impl(&self, id: i64) -> Result<bool> {
        let result = StudentNotes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除备注失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
