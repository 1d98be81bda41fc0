//! 课表存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classes::{Column as ClassColumn, Entity as Classes, Model as ClassModel};
use crate::entity::schedules::{ActiveModel, Column, Entity as Schedules, Model};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::schedules::{
    entities::Schedule,
    requests::{CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest},
    responses::ScheduleEntry,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_schedule_impl(&self, req: CreateScheduleRequest) -> Result<Schedule> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(req.class_id),
            day_of_week: Set(req.day_of_week),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            room: Set(req.room),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建课表失败: {e}")))?;

        Ok(result.into_schedule())
    }

    pub async fn get_schedule_by_id_impl(&self, id: i64) -> Result<Option<Schedule>> {
        let result = Schedules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课表失败: {e}")))?;

        Ok(result.map(|m| m.into_schedule()))
    }

    pub async fn update_schedule_impl(
        &self,
        id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<Schedule>> {
        let Some(existing) = Schedules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课表失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        if let Some(class_id) = update.class_id {
            model.class_id = Set(class_id);
        }
        if let Some(day) = update.day_of_week {
            model.day_of_week = Set(day);
        }
        if let Some(start_time) = update.start_time {
            model.start_time = Set(start_time);
        }
        if let Some(end_time) = update.end_time {
            model.end_time = Set(end_time);
        }
        if let Some(room) = update.room {
            model.room = Set(Some(room));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新课表失败: {e}")))?;

        Ok(Some(result.into_schedule()))
    }

    pub async fn delete_schedule_impl(&self, id: i64) -> Result<bool> {
        let result = Schedules::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除课表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按条件列出课表，按星期和开始时间排序
    pub async fn list_schedules_impl(
        &self,
        query: ScheduleListQuery,
        class_ids: Option<Vec<i64>>,
    ) -> Result<Vec<ScheduleEntry>> {
        let mut select = Schedules::find().find_also_related(Classes);

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(homeroom_id) = query.homeroom_id {
            select = select.filter(ClassColumn::HomeroomId.eq(homeroom_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(ClassColumn::TeacherId.eq(teacher_id));
        }
        if let Some(day) = query.day {
            select = select.filter(Column::DayOfWeek.eq(day));
        }
        if let Some(ids) = class_ids {
            if ids.is_empty() {
                return Ok(vec![]);
            }
            select = select.filter(Column::ClassId.is_in(ids));
        }

        let rows = select
            .order_by_asc(Column::DayOfWeek)
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课表失败: {e}")))?;

        self.build_schedule_entries(rows).await
    }

    /// 同一天内同班级或同教师的课表
    pub async fn list_schedule_conflict_candidates_impl(
        &self,
        day_of_week: i32,
        class_id: i64,
        teacher_id: i64,
    ) -> Result<Vec<ScheduleEntry>> {
        let rows = Schedules::find()
            .find_also_related(Classes)
            .filter(Column::DayOfWeek.eq(day_of_week))
            .filter(
                Condition::any()
                    .add(Column::ClassId.eq(class_id))
                    .add(ClassColumn::TeacherId.eq(teacher_id)),
            )
            .order_by_asc(Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课表失败: {e}")))?;

        self.build_schedule_entries(rows).await
    }

    async fn build_schedule_entries(
        &self,
        rows: Vec<(Model, Option<ClassModel>)>,
    ) -> Result<Vec<ScheduleEntry>> {
        let rows: Vec<(Model, ClassModel)> = rows
            .into_iter()
            .filter_map(|(schedule, class)| class.map(|c| (schedule, c)))
            .collect();
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let subject_ids: Vec<i64> = rows.iter().map(|(_, c)| c.subject_id).collect();
        let teacher_ids: Vec<i64> = rows.iter().map(|(_, c)| c.teacher_id).collect();

        let subjects: HashMap<i64, String> = Subjects::find()
            .filter(SubjectColumn::Id.is_in(subject_ids))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询科目失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let teachers: HashMap<i64, String> = Users::find()
            .filter(UserColumn::Id.is_in(teacher_ids))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询教师失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.full_name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|(schedule, class)| ScheduleEntry {
                schedule: schedule.into_schedule(),
                subject_name: subjects.get(&class.subject_id).cloned().unwrap_or_default(),
                teacher_name: teachers.get(&class.teacher_id).cloned().unwrap_or_default(),
                teacher_id: class.teacher_id,
                class_name: class.name,
            })
            .collect())
    }
}
