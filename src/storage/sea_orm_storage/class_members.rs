//! 班级成员存储操作

use std::collections::HashSet;

use super::SeaOrmStorage;
use crate::entity::class_members::{ActiveModel, Column, Entity as ClassMembers};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::classes::responses::{ClassMemberItem, EnrollStudentsResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 获取班级成员数量
    pub async fn count_class_members_impl(&self, class_id: i64) -> Result<i64> {
        let count = ClassMembers::find()
            .filter(Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级成员数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 列出班级成员，按姓名排序
    pub async fn list_class_members_impl(&self, class_id: i64) -> Result<Vec<ClassMemberItem>> {
        let rows = ClassMembers::find()
            .filter(Column::ClassId.eq(class_id))
            .find_also_related(Users)
            .order_by_asc(UserColumn::FullName)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, user)| {
                let user = user?.into_user();
                Some(ClassMemberItem {
                    member_id: member.id,
                    joined_at: crate::entity::to_datetime(member.joined_at),
                    homeroom_id: user.homeroom_id,
                    student: user.brief(),
                })
            })
            .collect())
    }

    /// 学生是否在班级中
    pub async fn is_class_member_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let count = ClassMembers::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(count > 0)
    }

    /// 选课
    ///
    /// 已在班级中的学生记入 skipped，其余学生在同一事务中加入。
    pub async fn enroll_students_impl(
        &self,
        class_id: i64,
        student_ids: &[i64],
    ) -> Result<EnrollStudentsResponse> {
        let existing: HashSet<i64> = ClassMembers::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::ClassId.eq(class_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级成员失败: {e}")))?
            .into_iter()
            .collect();

        let mut enrolled = Vec::new();
        let mut skipped = Vec::new();
        let mut seen = HashSet::new();
        for &id in student_ids {
            if !seen.insert(id) {
                continue;
            }
            if existing.contains(&id) {
                skipped.push(id);
            } else {
                enrolled.push(id);
            }
        }

        if !enrolled.is_empty() {
            let now = chrono::Utc::now().timestamp();
            let txn = self
                .db
                .begin()
                .await
                .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

            for &student_id in &enrolled {
                ActiveModel {
                    class_id: Set(class_id),
                    student_id: Set(student_id),
                    joined_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| LmsError::from_db("加入班级失败", e))?;
            }

            txn.commit()
                .await
                .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;
        }

        Ok(EnrollStudentsResponse { enrolled, skipped })
    }

    /// 移出班级
    pub async fn remove_class_member_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let result = ClassMembers::delete_many()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("移出班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生所在的班级 ID
    pub async fn list_student_class_ids_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        let ids = ClassMembers::find()
            .select_only()
            .column(Column::ClassId)
            .filter(Column::StudentId.eq(student_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询学生班级失败: {e}")))?;

        Ok(ids)
    }

    /// 教师执教的班级 ID
    pub async fn list_teacher_class_ids_impl(&self, teacher_id: i64) -> Result<Vec<i64>> {
        let ids = Classes::find()
            .select_only()
            .column(ClassColumn::Id)
            .filter(ClassColumn::TeacherId.eq(teacher_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询教师班级失败: {e}")))?;

        Ok(ids)
    }
}
