//! 行政班存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::homerooms::{ActiveModel, Column, Entity as Homerooms, Model};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    homerooms::{
        entities::Homeroom,
        requests::{CreateHomeroomRequest, HomeroomListQuery, UpdateHomeroomRequest},
        responses::{HomeroomDetail, HomeroomListResponse},
    },
    users::entities::{User, UserRole},
};
use crate::utils::{escape_like_pattern, like_contains};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建行政班
    pub async fn create_homeroom_impl(&self, req: CreateHomeroomRequest) -> Result<Homeroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            grade_level: Set(req.grade_level),
            academic_year: Set(req.academic_year),
            homeroom_teacher_id: Set(req.homeroom_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建行政班失败", e))?;

        Ok(result.into_homeroom())
    }

    pub async fn get_homeroom_by_id_impl(&self, id: i64) -> Result<Option<Homeroom>> {
        let result = Homerooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班失败: {e}")))?;

        Ok(result.map(|m| m.into_homeroom()))
    }

    pub async fn get_homeroom_by_name_impl(&self, name: &str) -> Result<Option<Homeroom>> {
        let result = Homerooms::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班失败: {e}")))?;

        Ok(result.map(|m| m.into_homeroom()))
    }

    pub async fn get_homeroom_by_teacher_impl(&self, teacher_id: i64) -> Result<Option<Homeroom>> {
        let result = Homerooms::find()
            .filter(Column::HomeroomTeacherId.eq(teacher_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班失败: {e}")))?;

        Ok(result.map(|m| m.into_homeroom()))
    }

    /// 获取行政班详情（班主任与学生人数）
    pub async fn get_homeroom_detail_impl(&self, id: i64) -> Result<Option<HomeroomDetail>> {
        let Some(model) = Homerooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班失败: {e}")))?
        else {
            return Ok(None);
        };

        Ok(self.build_homeroom_details(vec![model]).await?.pop())
    }

    /// 分页列出行政班
    pub async fn list_homerooms_with_pagination_impl(
        &self,
        query: HomeroomListQuery,
    ) -> Result<HomeroomListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Homerooms::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.like(like_contains(&escaped)));
        }

        if let Some(ref academic_year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(academic_year.as_str()));
        }

        if let Some(grade_level) = query.grade_level {
            select = select.filter(Column::GradeLevel.eq(grade_level as i32));
        }

        select = select
            .order_by_asc(Column::GradeLevel)
            .order_by_asc(Column::Name);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班总数失败: {e}")))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班列表失败: {e}")))?;

        Ok(HomeroomListResponse {
            items: self.build_homeroom_details(models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新行政班
    pub async fn update_homeroom_impl(
        &self,
        id: i64,
        update: UpdateHomeroomRequest,
    ) -> Result<Option<Homeroom>> {
        if self.get_homeroom_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(grade_level);
        }

        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(academic_year);
        }

        if update.clear_homeroom_teacher {
            model.homeroom_teacher_id = Set(None);
        } else if let Some(teacher_id) = update.homeroom_teacher_id {
            model.homeroom_teacher_id = Set(Some(teacher_id));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::from_db("更新行政班失败", e))?;

        Ok(Some(result.into_homeroom()))
    }

    pub async fn delete_homeroom_impl(&self, id: i64) -> Result<bool> {
        let result = Homerooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除行政班失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计行政班学生人数
    pub async fn count_homeroom_students_impl(&self, homeroom_id: i64) -> Result<i64> {
        let count = Users::find()
            .filter(UserColumn::HomeroomId.eq(homeroom_id))
            .filter(UserColumn::Role.eq(UserRole::SISWA))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计行政班学生失败: {e}")))?;

        Ok(count as i64)
    }

    /// 列出行政班学生，按姓名排序
    pub async fn list_homeroom_students_impl(&self, homeroom_id: i64) -> Result<Vec<User>> {
        let models = Users::find()
            .filter(UserColumn::HomeroomId.eq(homeroom_id))
            .filter(UserColumn::Role.eq(UserRole::SISWA))
            .order_by_asc(UserColumn::FullName)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班学生失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_user()).collect())
    }

    /// 将学生分配到行政班，非学生账号不受影响
    pub async fn assign_students_to_homeroom_impl(
        &self,
        homeroom_id: i64,
        student_ids: &[i64],
    ) -> Result<usize> {
        if student_ids.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let result = Users::update_many()
            .col_expr(
                UserColumn::HomeroomId,
                sea_orm::sea_query::Expr::value(homeroom_id),
            )
            .col_expr(UserColumn::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(UserColumn::Id.is_in(student_ids.to_vec()))
            .filter(UserColumn::Role.eq(UserRole::SISWA))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("分配学生失败: {e}")))?;

        Ok(result.rows_affected as usize)
    }

    /// 为行政班补充班主任信息和学生人数
    async fn build_homeroom_details(&self, models: Vec<Model>) -> Result<Vec<HomeroomDetail>> {
        if models.is_empty() {
            return Ok(vec![]);
        }

        let homeroom_ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let teacher_ids: Vec<i64> = models
            .iter()
            .filter_map(|m| m.homeroom_teacher_id)
            .collect();

        let teachers: HashMap<i64, User> = self
            .get_users_by_ids_impl(&teacher_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let counts: Vec<(Option<i64>, i64)> = Users::find()
            .select_only()
            .column(UserColumn::HomeroomId)
            .column_as(UserColumn::Id.count(), "student_count")
            .filter(UserColumn::HomeroomId.is_in(homeroom_ids))
            .filter(UserColumn::Role.eq(UserRole::SISWA))
            .group_by(UserColumn::HomeroomId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计行政班学生失败: {e}")))?;
        let counts: HashMap<i64, i64> = counts
            .into_iter()
            .filter_map(|(id, count)| id.map(|id| (id, count)))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| {
                let homeroom_teacher = m
                    .homeroom_teacher_id
                    .and_then(|id| teachers.get(&id))
                    .map(|u| u.brief());
                let student_count = counts.get(&m.id).copied().unwrap_or(0);
                HomeroomDetail {
                    homeroom: m.into_homeroom(),
                    homeroom_teacher,
                    student_count,
                }
            })
            .collect())
    }
}
