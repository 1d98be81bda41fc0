//! 统计与报表查询

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::attendance::totals_from_counts;
use crate::entity::prelude::{
    Assignments, AttendanceRecords, AttendanceSessions, Classes, DailyAttendances, Homerooms,
    Subjects, Submissions, Topics, Users,
};
use crate::entity::{
    assignments, attendance_records, attendance_sessions, classes, daily_attendances,
    submissions, topics, users,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    assignments::entities::SubmissionStatus,
    attendance::entities::{AttendanceStatus, AttendanceTotals},
    dashboard::responses::{AdminStatsResponse, RoleCount},
    homerooms::entities::{AttendanceEntry, DAILY_ATTENDANCE_SUBJECT, GradeEntry},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

/// YYYY-MM-DD 转为当天 0 点的时间戳
fn date_to_timestamp(date: &str) -> Option<i64> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

impl SeaOrmStorage {
    /// 管理员统计
    pub async fn get_admin_stats_impl(&self) -> Result<AdminStatsResponse> {
        let role_counts: Vec<(String, i64)> = Users::find()
            .select_only()
            .column(users::Column::Role)
            .column_as(users::Column::Id.count(), "user_count")
            .group_by(users::Column::Role)
            .order_by_asc(users::Column::Role)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计用户失败: {e}")))?;

        let homerooms = Homerooms::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计行政班失败: {e}")))?;
        let subjects = Subjects::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计科目失败: {e}")))?;
        let classes = Classes::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计班级失败: {e}")))?;
        let assignments = Assignments::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计作业失败: {e}")))?;
        let submissions = Submissions::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计提交失败: {e}")))?;

        Ok(AdminStatsResponse {
            users_by_role: role_counts
                .into_iter()
                .map(|(role, count)| RoleCount { role, count })
                .collect(),
            homerooms: homerooms as i64,
            subjects: subjects as i64,
            classes: classes as i64,
            assignments: assignments as i64,
            submissions: submissions as i64,
        })
    }

    /// 行政班关联班级的科目名（去重，按名称排序）
    pub async fn list_homeroom_subjects_impl(&self, homeroom_id: i64) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .homeroom_class_subjects(homeroom_id)
            .await?
            .into_values()
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// 行政班学生在关联班级中的已评分成绩
    pub async fn list_grade_entries_impl(&self, homeroom_id: i64) -> Result<Vec<GradeEntry>> {
        let class_subjects = self.homeroom_class_subjects(homeroom_id).await?;
        let student_ids = self.homeroom_student_ids(homeroom_id).await?;
        if class_subjects.is_empty() || student_ids.is_empty() {
            return Ok(vec![]);
        }

        let topic_class = self
            .topic_class_map(class_subjects.keys().copied().collect())
            .await?;
        if topic_class.is_empty() {
            return Ok(vec![]);
        }

        let assignment_topic: Vec<(i64, i64)> = Assignments::find()
            .select_only()
            .column(assignments::Column::Id)
            .column(assignments::Column::TopicId)
            .filter(assignments::Column::TopicId.is_in(topic_class.keys().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;
        let assignment_topic: HashMap<i64, i64> = assignment_topic.into_iter().collect();
        if assignment_topic.is_empty() {
            return Ok(vec![]);
        }

        let graded = Submissions::find()
            .filter(submissions::Column::AssignmentId.is_in(assignment_topic.keys().copied()))
            .filter(submissions::Column::StudentId.is_in(student_ids))
            .filter(submissions::Column::Status.eq(SubmissionStatus::Graded.as_str()))
            .filter(submissions::Column::Score.is_not_null())
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(graded
            .into_iter()
            .filter_map(|s| {
                let topic_id = assignment_topic.get(&s.assignment_id)?;
                let class_id = topic_class.get(topic_id)?;
                let subject = class_subjects.get(class_id)?.clone();
                Some(GradeEntry {
                    student_id: s.student_id,
                    subject,
                    score: s.score?,
                })
            })
            .collect())
    }

    /// 行政班的考勤条目：每日考勤 + 关联班级的网课考勤
    pub async fn list_attendance_entries_impl(
        &self,
        homeroom_id: i64,
    ) -> Result<Vec<AttendanceEntry>> {
        let student_ids = self.homeroom_student_ids(homeroom_id).await?;
        if student_ids.is_empty() {
            return Ok(vec![]);
        }

        let daily = DailyAttendances::find()
            .filter(daily_attendances::Column::HomeroomId.eq(homeroom_id))
            .filter(daily_attendances::Column::StudentId.is_in(student_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询每日考勤失败: {e}")))?;

        let mut entries: Vec<AttendanceEntry> = daily
            .into_iter()
            .filter_map(|d| {
                let meeting_at = date_to_timestamp(&d.date)?;
                let status = d.status.parse::<AttendanceStatus>().ok()?;
                Some(AttendanceEntry {
                    subject: DAILY_ATTENDANCE_SUBJECT.to_string(),
                    meeting_at,
                    meeting_id: meeting_at.div_euclid(86_400),
                    label: d.date,
                    student_id: d.student_id,
                    status,
                })
            })
            .collect();

        let class_subjects = self.homeroom_class_subjects(homeroom_id).await?;
        if class_subjects.is_empty() {
            return Ok(entries);
        }
        let topic_class = self
            .topic_class_map(class_subjects.keys().copied().collect())
            .await?;
        if topic_class.is_empty() {
            return Ok(entries);
        }

        let sessions: HashMap<i64, attendance_sessions::Model> = AttendanceSessions::find()
            .filter(attendance_sessions::Column::TopicId.is_in(topic_class.keys().copied()))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤场次失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        if sessions.is_empty() {
            return Ok(entries);
        }

        let records = AttendanceRecords::find()
            .filter(attendance_records::Column::SessionId.is_in(sessions.keys().copied()))
            .filter(attendance_records::Column::StudentId.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤记录失败: {e}")))?;

        entries.extend(records.into_iter().filter_map(|r| {
            let session = sessions.get(&r.session_id)?;
            let class_id = topic_class.get(&session.topic_id)?;
            Some(AttendanceEntry {
                subject: class_subjects.get(class_id)?.clone(),
                meeting_at: session.opens_at,
                meeting_id: session.id,
                label: session.title.clone(),
                student_id: r.student_id,
                status: r.status.parse::<AttendanceStatus>().ok()?,
            })
        }));

        Ok(entries)
    }

    /// 班级在 [from, to) 窗口内开放的场次数及考勤状态汇总
    pub async fn class_attendance_summary_impl(
        &self,
        class_id: i64,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<(i64, AttendanceTotals)> {
        let topic_ids: Vec<i64> = Topics::find()
            .select_only()
            .column(topics::Column::Id)
            .filter(topics::Column::ClassId.eq(class_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题失败: {e}")))?;
        if topic_ids.is_empty() {
            return Ok((0, AttendanceTotals::default()));
        }

        let mut select = AttendanceSessions::find()
            .select_only()
            .column(attendance_sessions::Column::Id)
            .filter(attendance_sessions::Column::TopicId.is_in(topic_ids));
        if let Some(from) = from {
            select = select.filter(attendance_sessions::Column::OpensAt.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(attendance_sessions::Column::OpensAt.lt(to));
        }

        let session_ids: Vec<i64> = select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤场次失败: {e}")))?;
        if session_ids.is_empty() {
            return Ok((0, AttendanceTotals::default()));
        }

        let counts: Vec<(String, i64)> = AttendanceRecords::find()
            .select_only()
            .column(attendance_records::Column::Status)
            .column_as(attendance_records::Column::Id.count(), "record_count")
            .filter(attendance_records::Column::SessionId.is_in(session_ids.clone()))
            .group_by(attendance_records::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计考勤失败: {e}")))?;

        Ok((session_ids.len() as i64, totals_from_counts(counts)))
    }

    /// 行政班关联班级 ID 到科目名的映射
    async fn homeroom_class_subjects(&self, homeroom_id: i64) -> Result<HashMap<i64, String>> {
        let rows = Classes::find()
            .find_also_related(Subjects)
            .filter(classes::Column::HomeroomId.eq(homeroom_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班班级失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(class, subject)| subject.map(|s| (class.id, s.name)))
            .collect())
    }

    async fn homeroom_student_ids(&self, homeroom_id: i64) -> Result<Vec<i64>> {
        Users::find()
            .select_only()
            .column(users::Column::Id)
            .filter(users::Column::HomeroomId.eq(homeroom_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询行政班学生失败: {e}")))
    }

    /// 主题 ID 到班级 ID 的映射
    async fn topic_class_map(&self, class_ids: Vec<i64>) -> Result<HashMap<i64, i64>> {
        let rows: Vec<(i64, i64)> = Topics::find()
            .select_only()
            .column(topics::Column::Id)
            .column(topics::Column::ClassId)
            .filter(topics::Column::ClassId.is_in(class_ids))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_to_timestamp() {
        assert_eq!(date_to_timestamp("1970-01-02"), Some(86_400));
        assert_eq!(date_to_timestamp("2025-13-01"), None);
        assert_eq!(date_to_timestamp("hari ini"), None);
    }
}
