use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 批量获取用户信息
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 找出已存在的用户名
    async fn find_existing_usernames(&self, usernames: &[String]) -> Result<Vec<String>>;
    // 批量导入用户，在同一事务中完成
    async fn import_users(&self, users: Vec<CreateUserRequest>) -> Result<Vec<User>>;

    /// 行政班管理方法
    async fn create_homeroom(&self, homeroom: CreateHomeroomRequest) -> Result<Homeroom>;
    async fn get_homeroom_by_id(&self, id: i64) -> Result<Option<Homeroom>>;
    async fn get_homeroom_by_name(&self, name: &str) -> Result<Option<Homeroom>>;
    // 获取班主任所带的行政班
    async fn get_homeroom_by_teacher(&self, teacher_id: i64) -> Result<Option<Homeroom>>;
    async fn get_homeroom_detail(&self, id: i64) -> Result<Option<HomeroomDetail>>;
    async fn list_homerooms_with_pagination(
        &self,
        query: HomeroomListQuery,
    ) -> Result<HomeroomListResponse>;
    async fn update_homeroom(
        &self,
        id: i64,
        update: UpdateHomeroomRequest,
    ) -> Result<Option<Homeroom>>;
    async fn delete_homeroom(&self, id: i64) -> Result<bool>;
    async fn count_homeroom_students(&self, homeroom_id: i64) -> Result<i64>;
    async fn list_homeroom_students(&self, homeroom_id: i64) -> Result<Vec<User>>;
    // 将学生分配到行政班，返回更新数量
    async fn assign_students_to_homeroom(
        &self,
        homeroom_id: i64,
        student_ids: &[i64],
    ) -> Result<usize>;

    /// 科目管理方法
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListParams,
    ) -> Result<SubjectListResponse>;
    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;
    // 科目是否仍被课程班级引用
    async fn is_subject_in_use(&self, id: i64) -> Result<bool>;

    /// 课程班级管理方法
    async fn create_class(&self, teacher_id: i64, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_detail(&self, class_id: i64) -> Result<Option<ClassDetail>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 不分页列出班级详情
    async fn list_class_details(&self, query: ClassListQuery) -> Result<Vec<ClassDetail>>;
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 班级成员管理方法
    async fn count_class_members(&self, class_id: i64) -> Result<i64>;
    async fn list_class_members(&self, class_id: i64) -> Result<Vec<ClassMemberItem>>;
    async fn is_class_member(&self, class_id: i64, student_id: i64) -> Result<bool>;
    // 选课，已在班级中的学生跳过
    async fn enroll_students(
        &self,
        class_id: i64,
        student_ids: &[i64],
    ) -> Result<EnrollStudentsResponse>;
    async fn remove_class_member(&self, class_id: i64, student_id: i64) -> Result<bool>;
    // 学生所在的班级 ID
    async fn list_student_class_ids(&self, student_id: i64) -> Result<Vec<i64>>;
    // 教师执教的班级 ID
    async fn list_teacher_class_ids(&self, teacher_id: i64) -> Result<Vec<i64>>;

    /// 主题与材料管理方法
    async fn create_topic(&self, class_id: i64, topic: CreateTopicRequest) -> Result<Topic>;
    async fn get_topic_by_id(&self, topic_id: i64) -> Result<Option<Topic>>;
    async fn list_topics(&self, class_id: i64) -> Result<Vec<Topic>>;
    async fn update_topic(&self, topic_id: i64, update: UpdateTopicRequest)
    -> Result<Option<Topic>>;
    async fn delete_topic(&self, topic_id: i64) -> Result<bool>;
    async fn create_material(
        &self,
        topic_id: i64,
        created_by: i64,
        material: CreateMaterialRequest,
    ) -> Result<Material>;
    async fn get_material_by_id(&self, material_id: i64) -> Result<Option<Material>>;
    async fn list_materials(&self, topic_id: i64) -> Result<Vec<Material>>;
    async fn delete_material(&self, material_id: i64) -> Result<bool>;

    /// 作业管理方法
    // 创建作业及其题目，在同一事务中完成
    async fn create_assignment(
        &self,
        topic_id: i64,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 获取作业及其所属班级
    async fn get_assignment_with_class(&self, id: i64) -> Result<Option<(Assignment, Class)>>;
    // 列出主题下的作业及题目数量
    async fn list_assignments(&self, topic_id: i64) -> Result<Vec<(Assignment, i64)>>;
    async fn list_questions(&self, assignment_id: i64, reveal: bool) -> Result<Vec<Question>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    // 学生尚未提交且未过期的作业
    async fn list_upcoming_assignments(
        &self,
        student_id: i64,
        now: i64,
    ) -> Result<Vec<UpcomingAssignment>>;

    /// 提交管理方法
    // 创建提交及答题记录，在同一事务中完成
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_student_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_student_submissions(
        &self,
        student_id: i64,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>>;
    async fn list_submission_answers(&self, submission_id: i64) -> Result<Vec<SubmissionAnswer>>;
    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<SubmissionListItem>>;
    async fn grade_submission(
        &self,
        id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>>;
    // 教师名下待批改的提交
    async fn list_pending_submissions(&self, teacher_id: i64) -> Result<Vec<PendingSubmission>>;

    /// 考勤管理方法
    async fn create_attendance_session(
        &self,
        topic_id: i64,
        created_by: i64,
        session: CreateSessionRequest,
    ) -> Result<AttendanceSession>;
    // 获取考勤场次及其所属班级
    async fn get_session_with_class(
        &self,
        session_id: i64,
    ) -> Result<Option<(AttendanceSession, Class)>>;
    async fn list_attendance_sessions(&self, topic_id: i64) -> Result<Vec<AttendanceSession>>;
    async fn delete_attendance_session(&self, session_id: i64) -> Result<bool>;
    async fn create_attendance_record(
        &self,
        session_id: i64,
        student_id: i64,
        status: AttendanceStatus,
        recorded_by: Option<i64>,
    ) -> Result<AttendanceRecord>;
    // 批量写入考勤记录（存在则覆盖），在同一事务中完成
    async fn upsert_attendance_records(
        &self,
        session_id: i64,
        marks: Vec<AttendanceMark>,
        recorded_by: i64,
    ) -> Result<usize>;
    async fn list_session_records(&self, session_id: i64) -> Result<Vec<AttendanceRecord>>;
    async fn upsert_daily_attendance(
        &self,
        homeroom_id: i64,
        date: &str,
        marks: Vec<AttendanceMark>,
        recorded_by: i64,
    ) -> Result<usize>;
    async fn list_daily_attendance(
        &self,
        homeroom_id: i64,
        date: &str,
    ) -> Result<Vec<DailyAttendance>>;
    // 学生个人的考勤汇总（在线 + 每日）
    async fn student_attendance_totals(&self, student_id: i64) -> Result<AttendanceTotals>;

    /// 课表管理方法
    async fn create_schedule(&self, schedule: CreateScheduleRequest) -> Result<Schedule>;
    async fn get_schedule_by_id(&self, id: i64) -> Result<Option<Schedule>>;
    async fn update_schedule(
        &self,
        id: i64,
        update: UpdateScheduleRequest,
    ) -> Result<Option<Schedule>>;
    async fn delete_schedule(&self, id: i64) -> Result<bool>;
    // 按条件列出课表；class_ids 为 Some 时仅限这些班级
    async fn list_schedules(
        &self,
        query: ScheduleListQuery,
        class_ids: Option<Vec<i64>>,
    ) -> Result<Vec<ScheduleEntry>>;
    // 同一天内属于该班级或该教师的课表，用于冲突检测
    async fn list_schedule_conflict_candidates(
        &self,
        day_of_week: i32,
        class_id: i64,
        teacher_id: i64,
    ) -> Result<Vec<ScheduleEntry>>;

    /// 公告管理方法
    async fn create_announcement(
        &self,
        author_id: i64,
        announcement: CreateAnnouncementRequest,
    ) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;
    async fn list_visible_announcements(
        &self,
        visibility: AnnouncementVisibility,
        page: u64,
        size: u64,
    ) -> Result<AnnouncementListResponse>;

    /// 学生备注管理方法
    async fn create_note(
        &self,
        homeroom_id: i64,
        author_id: i64,
        note: CreateNoteRequest,
    ) -> Result<StudentNote>;
    async fn get_note_by_id(&self, id: i64) -> Result<Option<StudentNote>>;
    async fn list_notes(
        &self,
        homeroom_id: i64,
        student_id: Option<i64>,
    ) -> Result<Vec<StudentNote>>;
    async fn update_note(&self, id: i64, update: UpdateNoteRequest)
    -> Result<Option<StudentNote>>;
    async fn delete_note(&self, id: i64) -> Result<bool>;

    /// 系统设置方法
    async fn list_settings(&self) -> Result<Vec<SystemSetting>>;
    // 批量更新设置，在同一事务中完成
    async fn update_settings(
        &self,
        items: Vec<(String, String)>,
        updated_by: i64,
    ) -> Result<Vec<SystemSetting>>;

    /// 统计与报表方法
    async fn get_admin_stats(&self) -> Result<AdminStatsResponse>;
    // 行政班关联课程班级的科目名称
    async fn list_homeroom_subjects(&self, homeroom_id: i64) -> Result<Vec<String>>;
    // 行政班学生在关联课程班级中的已批改成绩
    async fn list_grade_entries(&self, homeroom_id: i64) -> Result<Vec<GradeEntry>>;
    // 行政班的考勤条目（每日 + 在线）
    async fn list_attendance_entries(&self, homeroom_id: i64) -> Result<Vec<AttendanceEntry>>;
    // 班级在时间窗口内的考勤场次数与状态汇总
    async fn class_attendance_summary(
        &self,
        class_id: i64,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<(i64, AttendanceTotals)>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
