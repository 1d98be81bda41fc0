use serde::Serialize;
use ts_rs::TS;

use super::entities::Class;
use crate::models::common::PaginationInfo;
use crate::models::users::entities::UserBrief;

// 班级详情（含科目、教师和成员数）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub subject_code: String,
    pub subject_name: String,
    pub teacher_name: String,
    pub homeroom_name: Option<String>,
    pub member_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassResponse {
    pub class: ClassDetail,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<ClassDetail>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassMemberItem {
    pub member_id: i64,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    pub homeroom_id: Option<i64>,
    pub student: UserBrief,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassMemberListResponse {
    pub items: Vec<ClassMemberItem>,
}

// 批量添加学生结果：已在班级中的学生会被跳过
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct EnrollStudentsResponse {
    pub enrolled: Vec<i64>,
    pub skipped: Vec<i64>,
}
