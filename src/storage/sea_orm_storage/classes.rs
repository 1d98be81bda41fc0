//! 课程班级存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::class_members::{Column as MemberColumn, Entity as ClassMembers};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes, Model};
use crate::entity::homerooms::{Column as HomeroomColumn, Entity as Homerooms};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::{ClassDetail, ClassListResponse},
    },
};
use crate::utils::{escape_like_pattern, like_contains};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, SqlErr,
};

impl SeaOrmStorage {
    /// 创建课程班级
    pub async fn create_class_impl(
        &self,
        teacher_id: i64,
        req: CreateClassRequest,
    ) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            subject_id: Set(req.subject_id),
            teacher_id: Set(teacher_id),
            homeroom_id: Set(req.homeroom_id),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建班级失败", e))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 获取班级详情
    pub async fn get_class_detail_impl(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        let Some(model) = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.build_class_details(vec![model]).await?.pop())
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let Some(select) = self.class_select(&query).await? else {
            return Ok(ClassListResponse {
                items: vec![],
                pagination: PaginationInfo::new(page, size, 0),
            });
        };

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: self.build_class_details(models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 不分页列出班级详情
    pub async fn list_class_details_impl(&self, query: ClassListQuery) -> Result<Vec<ClassDetail>> {
        let Some(select) = self.class_select(&query).await? else {
            return Ok(vec![]);
        };

        let models = select
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级列表失败: {e}")))?;

        self.build_class_details(models).await
    }

    /// 更新班级
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(class_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(class_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(subject_id) = update.subject_id {
            model.subject_id = Set(subject_id);
        }

        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(teacher_id);
        }

        if let Some(homeroom_id) = update.homeroom_id {
            model.homeroom_id = Set(Some(homeroom_id));
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::from_db("更新班级失败", e))?;

        Ok(Some(result.into_class()))
    }

    /// 删除班级
    /// 删除班级；仍有选课学生时外键拒绝删除，返回 `Conflict`
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    LmsError::conflict(format!("班级 {class_id} 仍有学生选课"))
                }
                _ => LmsError::database_operation(format!("删除班级失败: {e}")),
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 按查询条件构造班级查询；学生没有任何选课时返回 None
    async fn class_select(&self, query: &ClassListQuery) -> Result<Option<Select<Classes>>> {
        let mut select = Classes::find();

        if let Some(student_id) = query.student_id {
            let class_ids = self.list_student_class_ids_impl(student_id).await?;
            if class_ids.is_empty() {
                return Ok(None);
            }
            select = select.filter(Column::Id.is_in(class_ids));
        }

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        if let Some(homeroom_id) = query.homeroom_id {
            select = select.filter(Column::HomeroomId.eq(homeroom_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.like(like_contains(&escaped)));
        }

        Ok(Some(select.order_by_asc(Column::Name)))
    }

    /// 为班级补充科目、教师、行政班名称和成员人数
    pub(crate) async fn build_class_details(&self, models: Vec<Model>) -> Result<Vec<ClassDetail>> {
        if models.is_empty() {
            return Ok(vec![]);
        }

        let class_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let subject_ids: Vec<i64> = models.iter().map(|m| m.subject_id).collect();
        let teacher_ids: Vec<i64> = models.iter().map(|m| m.teacher_id).collect();
        let homeroom_ids: Vec<i64> = models.iter().filter_map(|m| m.homeroom_id).collect();

        let subjects: HashMap<i64, (String, String)> = Subjects::find()
            .filter(SubjectColumn::Id.is_in(subject_ids))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询科目失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, (s.code, s.name)))
            .collect();

        let teachers: HashMap<i64, String> = Users::find()
            .filter(UserColumn::Id.is_in(teacher_ids))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询教师失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.full_name))
            .collect();

        let homerooms: HashMap<i64, String> = if homeroom_ids.is_empty() {
            HashMap::new()
        } else {
            Homerooms::find()
                .filter(HomeroomColumn::Id.is_in(homeroom_ids))
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询行政班失败: {e}")))?
                .into_iter()
                .map(|h| (h.id, h.name))
                .collect()
        };

        let counts: Vec<(i64, i64)> = ClassMembers::find()
            .select_only()
            .column(MemberColumn::ClassId)
            .column_as(MemberColumn::Id.count(), "member_count")
            .filter(MemberColumn::ClassId.is_in(class_ids))
            .group_by(MemberColumn::ClassId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计班级成员失败: {e}")))?;
        let counts: HashMap<i64, i64> = counts.into_iter().collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let (subject_code, subject_name) =
                    subjects.get(&m.subject_id).cloned().unwrap_or_default();
                let teacher_name = teachers.get(&m.teacher_id).cloned().unwrap_or_default();
                let homeroom_name = m.homeroom_id.and_then(|id| homerooms.get(&id).cloned());
                let member_count = counts.get(&m.id).copied().unwrap_or(0);
                ClassDetail {
                    class: m.into_class(),
                    subject_code,
                    subject_name,
                    teacher_name,
                    homeroom_name,
                    member_count,
                }
            })
            .collect())
    }
}
