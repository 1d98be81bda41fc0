use serde::Deserialize;
use ts_rs::TS;

use super::entities::AssignmentKind;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct NewOption {
    pub label: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct NewQuestion {
    pub prompt: String,
    pub options: Vec<NewOption>,
}

// 创建作业；测验在同一请求中携带题目和选项
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentKind,
    pub max_score: Option<f64>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    /// 为 true 时移除截止时间
    #[serde(default)]
    pub clear_deadline: bool,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AnswerItem {
    pub question_id: i64,
    pub option_id: Option<i64>,
}

// 提交作业：测验填写 answers，问答填写 content
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmitAssignmentRequest {
    #[serde(default)]
    pub answers: Vec<AnswerItem>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}
