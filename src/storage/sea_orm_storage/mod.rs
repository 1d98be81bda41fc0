//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod announcements;
mod assignments;
mod attendance;
mod class_members;
mod classes;
mod homerooms;
mod notes;
mod reports;
mod schedules;
mod subjects;
mod submissions;
mod system_settings;
mod topics;
mod users;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 使用内存 SQLite 创建存储实例
    ///
    /// 内存库按连接隔离，因此连接池固定为单连接。
    pub async fn new_in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::from_connection(db).await
    }

    /// 在已有连接上运行迁移并创建存储实例
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let mut pool_opt = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout));

        // 内存库的连接一旦回收，数据随之丢失
        pool_opt = if in_memory {
            pool_opt.idle_timeout(None).max_lifetime(None)
        } else {
            pool_opt.idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_opt
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持 sqlite://、postgres://、mysql:// 或 .db/.sqlite 路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    announcements::{
        entities::Announcement,
        requests::{AnnouncementVisibility, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        responses::AnnouncementListResponse,
    },
    assignments::{
        entities::{Assignment, NewSubmission, Question, Submission, SubmissionAnswer},
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::SubmissionListItem,
    },
    attendance::{
        entities::{
            AttendanceMark, AttendanceRecord, AttendanceSession, AttendanceStatus,
            AttendanceTotals, DailyAttendance,
        },
        requests::CreateSessionRequest,
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::{ClassDetail, ClassListResponse, ClassMemberItem, EnrollStudentsResponse},
    },
    dashboard::responses::{AdminStatsResponse, PendingSubmission, UpcomingAssignment},
    homerooms::{
        entities::{AttendanceEntry, GradeEntry, Homeroom, StudentNote},
        requests::{
            CreateHomeroomRequest, CreateNoteRequest, HomeroomListQuery, UpdateHomeroomRequest,
            UpdateNoteRequest,
        },
        responses::{HomeroomDetail, HomeroomListResponse},
    },
    schedules::{
        entities::Schedule,
        requests::{CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest},
        responses::ScheduleEntry,
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
    system::entities::SystemSetting,
    topics::{
        entities::{Material, Topic},
        requests::{CreateMaterialRequest, CreateTopicRequest, UpdateTopicRequest},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn find_existing_usernames(&self, usernames: &[String]) -> Result<Vec<String>> {
        self.find_existing_usernames_impl(usernames).await
    }

    async fn import_users(&self, users: Vec<CreateUserRequest>) -> Result<Vec<User>> {
        self.import_users_impl(users).await
    }

    // 行政班模块
    async fn create_homeroom(&self, homeroom: CreateHomeroomRequest) -> Result<Homeroom> {
        self.create_homeroom_impl(homeroom).await
    }

    async fn get_homeroom_by_id(&self, id: i64) -> Result<Option<Homeroom>> {
        self.get_homeroom_by_id_impl(id).await
    }

    async fn get_homeroom_by_name(&self, name: &str) -> Result<Option<Homeroom>> {
        self.get_homeroom_by_name_impl(name).await
    }

    async fn get_homeroom_by_teacher(&self, teacher_id: i64) -> Result<Option<Homeroom>> {
        self.get_homeroom_by_teacher_impl(teacher_id).await
    }

    async fn get_homeroom_detail(&self, id: i64) -> Result<Option<HomeroomDetail>> {
        self.get_homeroom_detail_impl(id).await
    }

    async fn list_homerooms_with_pagination(
        &self,
        query: HomeroomListQuery,
    ) -> Result<HomeroomListResponse> {
        self.list_homerooms_with_pagination_impl(query).await
    }

    async fn update_homeroom(
        &self,
        id: i64,
        update: UpdateHomeroomRequest,
    ) -> Result<Option<Homeroom>> {
        self.update_homeroom_impl(id, update).await
    }

    async fn delete_homeroom(&self, id: i64) -> Result<bool> {
        self.delete_homeroom_impl(id).await
    }

    async fn count_homeroom_students(&self, homeroom_id: i64) -> Result<i64> {
        self.count_homeroom_students_impl(homeroom_id).await
    }

    async fn list_homeroom_students(&self, homeroom_id: i64) -> Result<Vec<User>> {
        self.list_homeroom_students_impl(homeroom_id).await
    }

    async fn assign_students_to_homeroom(
        &self,
        homeroom_id: i64,
        student_ids: &[i64],
    ) -> Result<usize> {
        self.assign_students_to_homeroom_impl(homeroom_id, student_ids)
            .await
    }

    // 科目模块
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListParams,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn is_subject_in_use(&self, id: i64) -> Result<bool> {
        self.is_subject_in_use_impl(id).await
    }

    // 课程班级模块
    async fn create_class(&self, teacher_id: i64, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(teacher_id, class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>> {
        self.get_class_detail_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn list_class_details(&self, query: ClassListQuery) -> Result<Vec<ClassDetail>> {
        self.list_class_details_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 班级成员模块
    async fn count_class_members(&self, class_id: i64) -> Result<i64> {
        self.count_class_members_impl(class_id).await
    }

    async fn list_class_members(&self, class_id: i64) -> Result<Vec<ClassMemberItem>> {
        self.list_class_members_impl(class_id).await
    }

    async fn is_class_member(&self, class_id: i64, student_id: i64) -> Result<bool> {
        self.is_class_member_impl(class_id, student_id).await
    }

    async fn enroll_students(
        &self,
        class_id: i64,
        student_ids: &[i64],
    ) -> Result<EnrollStudentsResponse> {
        self.enroll_students_impl(class_id, student_ids).await
    }

    async fn remove_class_member(&self, class_id: i64, student_id: i64) -> Result<bool> {
        self.remove_class_member_impl(class_id, student_id).await
    }

    async fn list_student_class_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.list_student_class_ids_impl(student_id).await
    }

    async fn list_teacher_class_ids(&self, teacher_id: i64) -> Result<Vec<i64>> {
        self.list_teacher_class_ids_impl(teacher_id).await
    }

    // 主题与材料模块
    async fn create_topic(&self, class_id: i64, topic: CreateTopicRequest) -> Result<Topic> {
        self.create_topic_impl(class_id, topic).await
    }

    async fn get_topic_by_id(&self, topic_id: i64) -> Result<Option<Topic>> {
        self.get_topic_by_id_impl(topic_id).await
    }

    async fn list_topics(&self, class_id: i64) -> Result<Vec<Topic>> {
        self.list_topics_impl(class_id).await
    }

    async fn update_topic(
        &self,
        topic_id: i64,
        update: UpdateTopicRequest,
    ) -> Result<Option<Topic>> {
        self.update_topic_impl(topic_id, update).await
    }

    async fn delete_topic(&self, topic_id: i64) -> Result<bool> {
        self.delete_topic_impl(topic_id).await
    }

    async fn create_material(
        &self,
        topic_id: i64,
        created_by: i64,
        material: CreateMaterialRequest,
    ) -> Result<Material> {
        self.create_material_impl(topic_id, created_by, material)
            .await
    }

    async fn get_material_by_id(&self, material_id: i64) -> Result<Option<Material>> {
        self.get_material_by_id_impl(material_id).await
    }

    async fn list_materials(&self, topic_id: i64) -> Result<Vec<Material>> {
        self.list_materials_impl(topic_id).await
    }

    async fn delete_material(&self, material_id: i64) -> Result<bool> {
        self.delete_material_impl(material_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        topic_id: i64,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(topic_id, created_by, assignment)
            .await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn get_assignment_with_class(&self, id: i64) -> Result<Option<(Assignment, Class)>> {
        self.get_assignment_with_class_impl(id).await
    }

    async fn list_assignments(&self, topic_id: i64) -> Result<Vec<(Assignment, i64)>> {
        self.list_assignments_impl(topic_id).await
    }

    async fn list_questions(&self, assignment_id: i64, reveal: bool) -> Result<Vec<Question>> {
        self.list_questions_impl(assignment_id, reveal).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn list_upcoming_assignments(
        &self,
        student_id: i64,
        now: i64,
    ) -> Result<Vec<UpcomingAssignment>> {
        self.list_upcoming_assignments_impl(student_id, now).await
    }

    // 提交模块
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_student_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_student_submission_impl(assignment_id, student_id)
            .await
    }

    async fn list_student_submissions(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        self.list_student_submissions_impl(student_id, assignment_ids)
            .await
    }

    async fn list_submission_answers(&self, submission_id: i64) -> Result<Vec<SubmissionAnswer>> {
        self.list_submission_answers_impl(submission_id).await
    }

    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<SubmissionListItem>> {
        self.list_submissions_impl(assignment_id).await
    }

    async fn grade_submission(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(id, score, feedback, graded_by)
            .await
    }

    async fn list_pending_submissions(&self, teacher_id: i64) -> Result<Vec<PendingSubmission>> {
        self.list_pending_submissions_impl(teacher_id).await
    }

    // 考勤模块
    async fn create_attendance_session(
        &self,
        topic_id: i64,
        created_by: i64,
        session: CreateSessionRequest,
    ) -> Result<AttendanceSession> {
        self.create_attendance_session_impl(topic_id, created_by, session)
            .await
    }

    async fn get_session_with_class(
        &self,
        session_id: i64,
    ) -> Result<Option<(AttendanceSession, Class)>> {
        self.get_session_with_class_impl(session_id).await
    }

    async fn list_attendance_sessions(&self, topic_id: i64) -> Result<Vec<AttendanceSession>> {
        self.list_attendance_sessions_impl(topic_id).await
    }

    async fn delete_attendance_session(&self, session_id: i64) -> Result<bool> {
        self.delete_attendance_session_impl(session_id).await
    }

    async fn create_attendance_record(
        &self,
        session_id: i64,
        student_id: i64,
        status: AttendanceStatus,
        recorded_by: Option<i64>,
    ) -> Result<AttendanceRecord> {
        self.create_attendance_record_impl(session_id, student_id, status, recorded_by)
            .await
    }

    async fn upsert_attendance_records(
        &self,
        session_id: i64,
        marks: Vec<AttendanceMark>,
        recorded_by: i64,
    ) -> Result<usize> {
        self.upsert_attendance_records_impl(session_id, marks, recorded_by)
            .await
    }

    async fn list_session_records(&self, session_id: i64) -> Result<Vec<AttendanceRecord>> {
        self.list_session_records_impl(session_id).await
    }

    async fn upsert_daily_attendance(
        &self,
        homeroom_id: i64,
        date: &str,
        marks: Vec<AttendanceMark>,
        recorded_by: i64,
    ) -> Result<usize> {
        self.upsert_daily_attendance_impl(homeroom_id, date, marks, recorded_by)
            .await
    }

    async fn list_daily_attendance(
        &self,
        homeroom_id: i64,
        date: &str,
    ) -> Result<Vec<DailyAttendance>> {
        self.list_daily_attendance_impl(homeroom_id, date).await
    }

    async fn student_attendance_totals(&self, student_id: i64) -> Result<AttendanceTotals> {
        self.student_attendance_totals_impl(student_id).await
    }

    // 课表模块
    async fn create_schedule(&self, schedule: CreateScheduleRequest) -> Result<Schedule> {
        self.create_schedule_impl(schedule).await
    }

    async fn get_schedule_by_id(&self, id: i64) -> Result<Option<Schedule>> {
        self.get_schedule_by_id_impl(id).await
    }

    async fn update_schedule(
        &self,
        id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<Schedule>> {
        self.update_schedule_impl(id, update).await
    }

    async fn delete_schedule(&self, id: i64) -> Result<bool> {
        self.delete_schedule_impl(id).await
    }

    async fn list_schedules(
        &self,
        query: ScheduleListQuery,
        class_ids: Option<Vec<i64>>,
    ) -> Result<Vec<ScheduleEntry>> {
        self.list_schedules_impl(query, class_ids).await
    }

    async fn list_schedule_conflict_candidates(
        &self,
        day_of_week: i32,
        class_id: i64,
        teacher_id: i64,
    ) -> Result<Vec<ScheduleEntry>> {
        self.list_schedule_conflict_candidates_impl(day_of_week, class_id, teacher_id)
            .await
    }

    // 公告模块
    async fn create_announcement(
        &self,
        author_id: i64,
        announcement: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        self.create_announcement_impl(author_id, announcement).await
    }

    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_by_id_impl(id).await
    }

    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        self.update_announcement_impl(id, update).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }

    async fn list_visible_announcements(
        &self,
        visibility: AnnouncementVisibility,
        page: u64,
        size: u64,
    ) -> Result<AnnouncementListResponse> {
        self.list_visible_announcements_impl(visibility, page, size)
            .await
    }

    // 学生备注模块
    async fn create_note(
        &self,
        homeroom_id: i64,
        author_id: i64,
        note: CreateNoteRequest,
    ) -> Result<StudentNote> {
        self.create_note_impl(homeroom_id, author_id, note).await
    }

    async fn get_note_by_id(&self, id: i64) -> Result<Option<StudentNote>> {
        self.get_note_by_id_impl(id).await
    }

    async fn list_notes(
        &self,
        homeroom_id: i64,
        student_id: Option<i64>,
    ) -> Result<Vec<StudentNote>> {
        self.list_notes_impl(homeroom_id, student_id).await
    }

    async fn update_note(
        &self,
        id: i64,
        update: UpdateNoteRequest,
    ) -> Result<Option<StudentNote>> {
        self.update_note_impl(id, update).await
    }

    async fn delete_note(&self, id: i64) -> Result<bool> {
        self.delete_note_impl(id).await
    }

    // 系统设置模块
    async fn list_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_settings_impl().await
    }

    async fn update_settings(
        &self,
        items: Vec<(String, String)>,
        updated_by: i64,
    ) -> Result<Vec<SystemSetting>> {
        self.update_settings_impl(items, updated_by).await
    }

    // 统计与报表模块
    async fn get_admin_stats(&self) -> Result<AdminStatsResponse> {
        self.get_admin_stats_impl().await
    }

    async fn list_homeroom_subjects(&self, homeroom_id: i64) -> Result<Vec<String>> {
        self.list_homeroom_subjects_impl(homeroom_id).await
    }

    async fn list_grade_entries(&self, homeroom_id: i64) -> Result<Vec<GradeEntry>> {
        self.list_grade_entries_impl(homeroom_id).await
    }

    async fn list_attendance_entries(&self, homeroom_id: i64) -> Result<Vec<AttendanceEntry>> {
        self.list_attendance_entries_impl(homeroom_id).await
    }

    async fn class_attendance_summary(
        &self,
        class_id: i64,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<(i64, AttendanceTotals)> {
        self.class_attendance_summary_impl(class_id, from, to).await
    }
}
