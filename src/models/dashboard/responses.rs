use serde::Serialize;
use ts_rs::TS;

use crate::models::announcements::responses::AnnouncementItem;
use crate::models::assignments::entities::Assignment;
use crate::models::attendance::entities::AttendanceTotals;
use crate::models::classes::responses::ClassDetail;
use crate::models::homerooms::responses::HomeroomDetail;
use crate::models::schedules::responses::ScheduleEntry;
use crate::models::users::entities::UserBrief;

// 待完成作业
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct UpcomingAssignment {
    pub assignment: Assignment,
    pub class_id: i64,
    pub class_name: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboardResponse {
    pub classes: Vec<ClassDetail>,
    pub upcoming_assignments: Vec<UpcomingAssignment>,
    pub today_schedule: Vec<ScheduleEntry>,
    pub announcements: Vec<AnnouncementItem>,
    pub attendance: AttendanceTotals,
}

// 待批改的提交
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct PendingSubmission {
    pub submission_id: i64,
    pub assignment_id: i64,
    pub assignment_title: String,
    pub class_id: i64,
    pub class_name: String,
    pub student: UserBrief,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct HomeroomSummary {
    pub homeroom: HomeroomDetail,
    pub today: String,
    pub today_attendance: AttendanceTotals,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherDashboardResponse {
    pub classes: Vec<ClassDetail>,
    pub pending_submissions: Vec<PendingSubmission>,
    pub today_schedule: Vec<ScheduleEntry>,
    pub homeroom: Option<HomeroomSummary>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct RoleCount {
    pub role: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct AdminStatsResponse {
    pub users_by_role: Vec<RoleCount>,
    pub homerooms: i64,
    pub subjects: i64,
    pub classes: i64,
    pub assignments: i64,
    pub submissions: i64,
}
