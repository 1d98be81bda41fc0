use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 行政班（rombel）：固定的学生分组，例如 "XI IPA 1"
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct Homeroom {
    pub id: i64,
    pub name: String,
    pub grade_level: i32,
    pub academic_year: String,
    pub homeroom_teacher_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

define_string_enum! {
    // 学生备注类别
    NoteCategory("../frontend/src/types/generated/homeroom.ts") {
        Akademik => "akademik",
        Perilaku => "perilaku",
        Lainnya => "lainnya",
    }
}

// 班主任对学生的备注
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct StudentNote {
    pub id: i64,
    pub homeroom_id: i64,
    pub student_id: i64,
    pub author_id: i64,
    pub category: NoteCategory,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 成绩汇总的原始数据：某学生在某科目的一次已评分提交
#[derive(Debug, Clone, PartialEq)]
pub struct GradeEntry {
    pub student_id: i64,
    pub subject: String,
    pub score: f64,
}

/// 每日考勤在考勤汇总中的科目名
pub const DAILY_ATTENDANCE_SUBJECT: &str = "Harian";

/// 考勤汇总的原始数据：某学生在某科目某次课的考勤
///
/// 每日考勤的 `meeting_id` 为日期对应的天数，网课考勤为场次 ID。
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceEntry {
    pub subject: String,
    pub meeting_at: i64,
    pub meeting_id: i64,
    pub label: String,
    pub student_id: i64,
    pub status: crate::models::attendance::entities::AttendanceStatus,
}
