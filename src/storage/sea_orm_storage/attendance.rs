//! 考勤存储操作（在线考勤场次与每日考勤）

use super::SeaOrmStorage;
use crate::entity::attendance_records::{
    ActiveModel as RecordActiveModel, Column as RecordColumn, Entity as AttendanceRecords,
};
use crate::entity::attendance_sessions::{ActiveModel, Column, Entity as AttendanceSessions};
use crate::entity::daily_attendances::{
    ActiveModel as DailyActiveModel, Column as DailyColumn, Entity as DailyAttendances,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    attendance::{
        entities::{
            AttendanceMark, AttendanceRecord, AttendanceSession, AttendanceStatus,
            AttendanceTotals, DailyAttendance,
        },
        requests::CreateSessionRequest,
    },
    classes::entities::Class,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

/// 将 (status, count) 分组结果累加为汇总
pub(crate) fn totals_from_counts(rows: Vec<(String, i64)>) -> AttendanceTotals {
    let mut totals = AttendanceTotals::default();
    for (status, count) in rows {
        if let Ok(status) = status.parse::<AttendanceStatus>() {
            totals.add(status, count);
        }
    }
    totals
}

impl SeaOrmStorage {
    /// 创建在线考勤场次
    pub async fn create_attendance_session_impl(
        &self,
        topic_id: i64,
        created_by: i64,
        req: CreateSessionRequest,
    ) -> Result<AttendanceSession> {
        let model = ActiveModel {
            topic_id: Set(topic_id),
            title: Set(req.title),
            opens_at: Set(req.opens_at.timestamp()),
            closes_at: Set(req.closes_at.timestamp()),
            created_by: Set(created_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建考勤场次失败: {e}")))?;

        Ok(result.into_session())
    }

    /// 获取考勤场次及其所属班级
    pub async fn get_session_with_class_impl(
        &self,
        session_id: i64,
    ) -> Result<Option<(AttendanceSession, Class)>> {
        let Some(session) = AttendanceSessions::find_by_id(session_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤场次失败: {e}")))?
        else {
            return Ok(None);
        };

        let class = self.get_topic_class(session.topic_id).await?;
        Ok(class.map(|class| (session.into_session(), class)))
    }

    pub async fn list_attendance_sessions_impl(
        &self,
        topic_id: i64,
    ) -> Result<Vec<AttendanceSession>> {
        let models = AttendanceSessions::find()
            .filter(Column::TopicId.eq(topic_id))
            .order_by_asc(Column::OpensAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤场次失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_session()).collect())
    }

    pub async fn delete_attendance_session_impl(&self, session_id: i64) -> Result<bool> {
        let result = AttendanceSessions::delete_by_id(session_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除考勤场次失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 写入单条考勤记录，重复记录返回 Conflict
    pub async fn create_attendance_record_impl(
        &self,
        session_id: i64,
        student_id: i64,
        status: AttendanceStatus,
        recorded_by: Option<i64>,
    ) -> Result<AttendanceRecord> {
        let model = RecordActiveModel {
            session_id: Set(session_id),
            student_id: Set(student_id),
            status: Set(status.to_string()),
            note: Set(None),
            recorded_by: Set(recorded_by),
            recorded_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("记录考勤失败", e))?;

        Ok(result.into_record())
    }

    /// 批量写入考勤记录，已有记录被覆盖
    pub async fn upsert_attendance_records_impl(
        &self,
        session_id: i64,
        marks: Vec<AttendanceMark>,
        recorded_by: i64,
    ) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let mut updated = 0;
        for mark in marks {
            let existing = AttendanceRecords::find()
                .filter(
                    Condition::all()
                        .add(RecordColumn::SessionId.eq(session_id))
                        .add(RecordColumn::StudentId.eq(mark.student_id)),
                )
                .one(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询考勤记录失败: {e}")))?;

            let mut model = match existing {
                Some(record) => RecordActiveModel {
                    id: Set(record.id),
                    ..Default::default()
                },
                None => RecordActiveModel {
                    session_id: Set(session_id),
                    student_id: Set(mark.student_id),
                    ..Default::default()
                },
            };
            model.status = Set(mark.status.to_string());
            model.note = Set(mark.note);
            model.recorded_by = Set(Some(recorded_by));
            model.recorded_at = Set(now);

            model
                .save(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("保存考勤记录失败: {e}")))?;
            updated += 1;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated)
    }

    pub async fn list_session_records_impl(
        &self,
        session_id: i64,
    ) -> Result<Vec<AttendanceRecord>> {
        let models = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_record()).collect())
    }

    /// 批量写入每日考勤，以 (学生, 日期) 为键覆盖
    pub async fn upsert_daily_attendance_impl(
        &self,
        homeroom_id: i64,
        date: &str,
        marks: Vec<AttendanceMark>,
        recorded_by: i64,
    ) -> Result<usize> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let mut updated = 0;
        for mark in marks {
            let existing = DailyAttendances::find()
                .filter(
                    Condition::all()
                        .add(DailyColumn::StudentId.eq(mark.student_id))
                        .add(DailyColumn::Date.eq(date)),
                )
                .one(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询每日考勤失败: {e}")))?;

            let mut model = match existing {
                Some(record) => DailyActiveModel {
                    id: Set(record.id),
                    ..Default::default()
                },
                None => DailyActiveModel {
                    student_id: Set(mark.student_id),
                    date: Set(date.to_string()),
                    ..Default::default()
                },
            };
            model.homeroom_id = Set(homeroom_id);
            model.status = Set(mark.status.to_string());
            model.note = Set(mark.note);
            model.recorded_by = Set(recorded_by);
            model.recorded_at = Set(now);

            model
                .save(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("保存每日考勤失败: {e}")))?;
            updated += 1;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated)
    }

    pub async fn list_daily_attendance_impl(
        &self,
        homeroom_id: i64,
        date: &str,
    ) -> Result<Vec<DailyAttendance>> {
        let models = DailyAttendances::find()
            .filter(DailyColumn::HomeroomId.eq(homeroom_id))
            .filter(DailyColumn::Date.eq(date))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询每日考勤失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_daily_attendance()).collect())
    }

    /// 学生个人考勤汇总（在线考勤 + 每日考勤）
    pub async fn student_attendance_totals_impl(
        &self,
        student_id: i64,
    ) -> Result<AttendanceTotals> {
        let mut rows: Vec<(String, i64)> = AttendanceRecords::find()
            .select_only()
            .column(RecordColumn::Status)
            .column_as(RecordColumn::Id.count(), "record_count")
            .filter(RecordColumn::StudentId.eq(student_id))
            .group_by(RecordColumn::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计考勤失败: {e}")))?;

        let daily: Vec<(String, i64)> = DailyAttendances::find()
            .select_only()
            .column(DailyColumn::Status)
            .column_as(DailyColumn::Id.count(), "record_count")
            .filter(DailyColumn::StudentId.eq(student_id))
            .group_by(DailyColumn::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计每日考勤失败: {e}")))?;

        rows.extend(daily);
        Ok(totals_from_counts(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_from_counts_ignores_unknown_status() {
        let totals = totals_from_counts(vec![
            ("hadir".to_string(), 3),
            ("alpa".to_string(), 1),
            ("hadir".to_string(), 2),
            ("terlambat".to_string(), 7),
        ]);
        assert_eq!(totals.hadir, 5);
        assert_eq!(totals.alpa, 1);
        assert_eq!(totals.total(), 6);
    }
}
