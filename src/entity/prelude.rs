//! 预导入模块，方便使用

pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::attendance_records::{
    ActiveModel as AttendanceRecordActiveModel, Entity as AttendanceRecords,
    Model as AttendanceRecordModel,
};
pub use super::attendance_sessions::{
    ActiveModel as AttendanceSessionActiveModel, Entity as AttendanceSessions,
    Model as AttendanceSessionModel,
};
pub use super::class_members::{
    ActiveModel as ClassMemberActiveModel, Entity as ClassMembers, Model as ClassMemberModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::daily_attendances::{
    ActiveModel as DailyAttendanceActiveModel, Entity as DailyAttendances,
    Model as DailyAttendanceModel,
};
pub use super::homerooms::{
    ActiveModel as HomeroomActiveModel, Entity as Homerooms, Model as HomeroomModel,
};
pub use super::materials::{
    ActiveModel as MaterialActiveModel, Entity as Materials, Model as MaterialModel,
};
pub use super::question_options::{
    ActiveModel as QuestionOptionActiveModel, Entity as QuestionOptions,
    Model as QuestionOptionModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::schedules::{
    ActiveModel as ScheduleActiveModel, Entity as Schedules, Model as ScheduleModel,
};
pub use super::student_notes::{
    ActiveModel as StudentNoteActiveModel, Entity as StudentNotes, Model as StudentNoteModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::submission_answers::{
    ActiveModel as SubmissionAnswerActiveModel, Entity as SubmissionAnswers,
    Model as SubmissionAnswerModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::system_settings::{
    ActiveModel as SystemSettingActiveModel, Entity as SystemSettings,
    Model as SystemSettingModel,
};
pub use super::topics::{ActiveModel as TopicActiveModel, Entity as Topics, Model as TopicModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
