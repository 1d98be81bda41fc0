use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建行政班（rombel）表
        // homeroom_teacher_id 与 users 互相引用，这里不建外键，由存储层维护
        manager
            .create_table(
                Table::create()
                    .table(Homerooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Homerooms::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Homerooms::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Homerooms::GradeLevel).integer().not_null())
                    .col(ColumnDef::new(Homerooms::AcademicYear).string().not_null())
                    .col(
                        ColumnDef::new(Homerooms::HomeroomTeacherId)
                            .big_integer()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Homerooms::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Homerooms::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().null().unique_key())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::NisNip).string().null())
                    .col(ColumnDef::new(Users::HomeroomId).big_integer().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Users::Table, Users::HomeroomId)
                            .to(Homerooms::Table, Homerooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建科目表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subjects::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text().null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建课程班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Classes::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Classes::HomeroomId).big_integer().null())
                    .col(ColumnDef::new(Classes::Description).text().null())
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::HomeroomId)
                            .to(Homerooms::Table, Homerooms::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建班级成员表
        manager
            .create_table(
                Table::create()
                    .table(ClassMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClassMembers::ClassId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ClassMembers::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassMembers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassMembers::Table, ClassMembers::ClassId)
                            .to(Classes::Table, Classes::Id)
                            // 有学生选课的班级不能删除
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassMembers::Table, ClassMembers::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建主题表
        manager
            .create_table(
                Table::create()
                    .table(Topics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Topics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Topics::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Topics::Title).string().not_null())
                    .col(ColumnDef::new(Topics::Description).text().null())
                    .col(ColumnDef::new(Topics::OrderIndex).integer().not_null())
                    .col(ColumnDef::new(Topics::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Topics::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Topics::Table, Topics::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学习材料表
        manager
            .create_table(
                Table::create()
                    .table(Materials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Materials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Materials::TopicId).big_integer().not_null())
                    .col(ColumnDef::new(Materials::Title).string().not_null())
                    .col(ColumnDef::new(Materials::Content).text().null())
                    .col(ColumnDef::new(Materials::LinkUrl).string().null())
                    .col(ColumnDef::new(Materials::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Materials::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Materials::Table, Materials::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Materials::Table, Materials::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::TopicId).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::Kind).string().not_null())
                    .col(ColumnDef::new(Assignments::MaxScore).double().not_null())
                    .col(ColumnDef::new(Assignments::Deadline).big_integer().null())
                    .col(
                        ColumnDef::new(Assignments::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建题目表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Questions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questions::Prompt).text().not_null())
                    .col(ColumnDef::new(Questions::OrderIndex).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选项表
        manager
            .create_table(
                Table::create()
                    .table(QuestionOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionOptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionOptions::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuestionOptions::Label).text().not_null())
                    .col(
                        ColumnDef::new(QuestionOptions::IsCorrect)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuestionOptions::Table, QuestionOptions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Content).text().null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::Score).double().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(
                        ColumnDef::new(Submissions::IsLate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建答题记录表
        manager
            .create_table(
                Table::create()
                    .table(SubmissionAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionAnswers::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionAnswers::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionAnswers::OptionId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionAnswers::IsCorrect)
                            .boolean()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubmissionAnswers::Table, SubmissionAnswers::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubmissionAnswers::Table, SubmissionAnswers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建在线考勤场次表
        manager
            .create_table(
                Table::create()
                    .table(AttendanceSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::TopicId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceSessions::Title).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceSessions::OpensAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::ClosesAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceSessions::Table, AttendanceSessions::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建在线考勤记录表
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::Status).string().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Note).text().null())
                    .col(
                        ColumnDef::new(AttendanceRecords::RecordedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::RecordedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::SessionId)
                            .to(AttendanceSessions::Table, AttendanceSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建每日考勤表
        manager
            .create_table(
                Table::create()
                    .table(DailyAttendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyAttendances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyAttendances::HomeroomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyAttendances::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DailyAttendances::Date).string().not_null())
                    .col(ColumnDef::new(DailyAttendances::Status).string().not_null())
                    .col(ColumnDef::new(DailyAttendances::Note).text().null())
                    .col(
                        ColumnDef::new(DailyAttendances::RecordedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyAttendances::RecordedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DailyAttendances::Table, DailyAttendances::HomeroomId)
                            .to(Homerooms::Table, Homerooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DailyAttendances::Table, DailyAttendances::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课表
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Schedules::DayOfWeek).integer().not_null())
                    .col(ColumnDef::new(Schedules::StartTime).string().not_null())
                    .col(ColumnDef::new(Schedules::EndTime).string().not_null())
                    .col(ColumnDef::new(Schedules::Room).string().null())
                    .col(ColumnDef::new(Schedules::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Schedules::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Schedules::Table, Schedules::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建公告表
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcements::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Announcements::AuthorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Announcements::ClassId).big_integer().null())
                    .col(ColumnDef::new(Announcements::Title).string().not_null())
                    .col(ColumnDef::new(Announcements::Content).text().not_null())
                    .col(ColumnDef::new(Announcements::Audience).string().not_null())
                    .col(
                        ColumnDef::new(Announcements::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Announcements::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Announcements::Table, Announcements::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Announcements::Table, Announcements::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生备注表
        manager
            .create_table(
                Table::create()
                    .table(StudentNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentNotes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentNotes::HomeroomId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentNotes::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentNotes::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(StudentNotes::Category).string().not_null())
                    .col(ColumnDef::new(StudentNotes::Content).text().not_null())
                    .col(
                        ColumnDef::new(StudentNotes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentNotes::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentNotes::Table, StudentNotes::HomeroomId)
                            .to(Homerooms::Table, Homerooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentNotes::Table, StudentNotes::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 唯一约束：一名学生在一个班级中只能出现一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_class_members_class_student")
                    .table(ClassMembers::Table)
                    .col(ClassMembers::ClassId)
                    .col(ClassMembers::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 唯一约束：每个作业每名学生只能提交一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 唯一约束：每个考勤场次每名学生一条记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_attendance_records_session_student")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::SessionId)
                    .col(AttendanceRecords::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 唯一约束：每名学生每天一条每日考勤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_daily_attendances_student_date")
                    .table(DailyAttendances::Table)
                    .col(DailyAttendances::StudentId)
                    .col(DailyAttendances::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_homeroom_id")
                    .table(Users::Table)
                    .col(Users::HomeroomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classes_teacher_id")
                    .table(Classes::Table)
                    .col(Classes::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_topics_class_id")
                    .table(Topics::Table)
                    .col(Topics::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_topic_id")
                    .table(Assignments::Table)
                    .col(Assignments::TopicId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedules_class_day")
                    .table(Schedules::Table)
                    .col(Schedules::ClassId)
                    .col(Schedules::DayOfWeek)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(StudentNotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Announcements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyAttendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubmissionAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuestionOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Materials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Topics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Homerooms::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Homerooms {
    #[sea_orm(iden = "homerooms")]
    Table,
    Id,
    Name,
    GradeLevel,
    AcademicYear,
    HomeroomTeacherId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    FullName,
    PasswordHash,
    Role,
    Status,
    NisNip,
    HomeroomId,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Code,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    Name,
    SubjectId,
    TeacherId,
    HomeroomId,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassMembers {
    #[sea_orm(iden = "class_members")]
    Table,
    Id,
    ClassId,
    StudentId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Topics {
    #[sea_orm(iden = "topics")]
    Table,
    Id,
    ClassId,
    Title,
    Description,
    OrderIndex,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Materials {
    #[sea_orm(iden = "materials")]
    Table,
    Id,
    TopicId,
    Title,
    Content,
    LinkUrl,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    TopicId,
    Title,
    Description,
    Kind,
    MaxScore,
    Deadline,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    AssignmentId,
    Prompt,
    OrderIndex,
}

#[derive(DeriveIden)]
enum QuestionOptions {
    #[sea_orm(iden = "question_options")]
    Table,
    Id,
    QuestionId,
    Label,
    IsCorrect,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    Status,
    Score,
    Feedback,
    IsLate,
    SubmittedAt,
    GradedAt,
    GradedBy,
}

#[derive(DeriveIden)]
enum SubmissionAnswers {
    #[sea_orm(iden = "submission_answers")]
    Table,
    Id,
    SubmissionId,
    QuestionId,
    OptionId,
    IsCorrect,
}

#[derive(DeriveIden)]
enum AttendanceSessions {
    #[sea_orm(iden = "attendance_sessions")]
    Table,
    Id,
    TopicId,
    Title,
    OpensAt,
    ClosesAt,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AttendanceRecords {
    #[sea_orm(iden = "attendance_records")]
    Table,
    Id,
    SessionId,
    StudentId,
    Status,
    Note,
    RecordedBy,
    RecordedAt,
}

#[derive(DeriveIden)]
enum DailyAttendances {
    #[sea_orm(iden = "daily_attendances")]
    Table,
    Id,
    HomeroomId,
    StudentId,
    Date,
    Status,
    Note,
    RecordedBy,
    RecordedAt,
}

#[derive(DeriveIden)]
enum Schedules {
    #[sea_orm(iden = "schedules")]
    Table,
    Id,
    ClassId,
    DayOfWeek,
    StartTime,
    EndTime,
    Room,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Announcements {
    #[sea_orm(iden = "announcements")]
    Table,
    Id,
    AuthorId,
    ClassId,
    Title,
    Content,
    Audience,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentNotes {
    #[sea_orm(iden = "student_notes")]
    Table,
    Id,
    HomeroomId,
    StudentId,
    AuthorId,
    Category,
    Content,
    CreatedAt,
    UpdatedAt,
}
