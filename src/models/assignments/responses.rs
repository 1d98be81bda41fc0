use serde::Serialize;
use ts_rs::TS;

use super::entities::{Assignment, Question, Submission, SubmissionAnswer, SubmissionStatus};
use crate::models::users::entities::UserBrief;

// 学生自己的提交概况
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmissionBrief {
    pub id: i64,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub is_late: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Submission> for SubmissionBrief {
    fn from(s: &Submission) -> Self {
        Self {
            id: s.id,
            status: s.status,
            score: s.score,
            is_late: s.is_late,
            submitted_at: s.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub question_count: i64,
    /// 仅学生请求时返回
    pub my_submission: Option<SubmissionBrief>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<AssignmentListItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentDetailResponse {
    pub assignment: Assignment,
    pub class_id: i64,
    pub questions: Vec<Question>,
}

// 测验自动评分结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
    pub score: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmitAssignmentResponse {
    pub submission: Submission,
    pub result: Option<QuizResult>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmissionListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student: UserBrief,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionListItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct MySubmissionResponse {
    pub submission: Submission,
    pub answers: Vec<SubmissionAnswer>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmissionResponse {
    pub submission: Submission,
}
