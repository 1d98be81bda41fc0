//! 科目存储操作

use super::SeaOrmStorage;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
};
use crate::utils::{escape_like_pattern, like_contains};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建科目失败", e))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_with_pagination_impl(
        &self,
        query: SubjectListParams,
    ) -> Result<SubjectListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Subjects::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.like(like_contains(&escaped)))
                    .add(Column::Name.like(like_contains(&escaped))),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询科目总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询科目列表失败: {e}")))?;

        Ok(SubjectListResponse {
            items: models.into_iter().map(|m| m.into_subject()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        if self.get_subject_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(code) = update.code {
            model.code = Set(code);
        }

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::from_db("更新科目失败", e))?;

        Ok(Some(result.into_subject()))
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 科目是否被课程班级引用
    pub async fn is_subject_in_use_impl(&self, id: i64) -> Result<bool> {
        let count = Classes::find()
            .filter(ClassColumn::SubjectId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询科目引用失败: {e}")))?;

        Ok(count > 0)
    }
}
