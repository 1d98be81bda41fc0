use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 作业类型：选择题测验（自动评分）或问答（人工评分）
    AssignmentKind("../frontend/src/types/generated/assignment.ts") {
        Quiz => "quiz",
        Essay => "essay",
    }
}

define_string_enum! {
    // 提交状态
    SubmissionStatus("../frontend/src/types/generated/assignment.ts") {
        Submitted => "submitted",
        Graded => "graded",
    }
}

// 作业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub topic_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentKind,
    pub max_score: f64,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 给定时间提交是否迟交
    pub fn is_late_at(&self, at: chrono::DateTime<chrono::Utc>) -> bool {
        self.deadline.is_some_and(|deadline| at > deadline)
    }
}

// 测验题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Question {
    pub id: i64,
    pub assignment_id: i64,
    pub prompt: String,
    pub order_index: i32,
    pub options: Vec<QuestionOption>,
}

// 题目选项，学生视图中不包含 is_correct
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub is_correct: Option<bool>,
}

// 提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub is_late: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_by: Option<i64>,
}

// 测验答题记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmissionAnswer {
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    pub option_id: Option<i64>,
    pub is_correct: bool,
}

/// 评分后的单题答案，写入存储前使用
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAnswer {
    pub question_id: i64,
    pub option_id: Option<i64>,
    pub is_correct: bool,
}

/// 新提交（存储层写入参数）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub is_late: bool,
    pub answers: Vec<GradedAnswer>,
}
