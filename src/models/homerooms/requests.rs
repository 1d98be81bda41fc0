use serde::Deserialize;
use ts_rs::TS;

use super::entities::NoteCategory;
use crate::models::common::{PaginationQuery, pagination::deserialize_option_string_to_i64};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct HomeroomListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub academic_year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_string_to_i64")]
    pub grade_level: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct CreateHomeroomRequest {
    pub name: String,
    pub grade_level: i32,
    pub academic_year: String,
    pub homeroom_teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct UpdateHomeroomRequest {
    pub name: Option<String>,
    pub grade_level: Option<i32>,
    pub academic_year: Option<String>,
    pub homeroom_teacher_id: Option<i64>,
    /// 为 true 时移除班主任（优先于 homeroom_teacher_id）
    #[serde(default)]
    pub clear_homeroom_teacher: bool,
}

// 分配学生到行政班
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct AssignStudentsRequest {
    pub student_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct NoteListParams {
    pub student_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct CreateNoteRequest {
    pub student_id: i64,
    pub category: NoteCategory,
    pub content: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/homeroom.ts")]
pub struct UpdateNoteRequest {
    pub category: Option<NoteCategory>,
    pub content: Option<String>,
}

/// 存储层行政班列表查询
#[derive(Debug, Clone, Default)]
pub struct HomeroomListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub academic_year: Option<String>,
    pub grade_level: Option<i64>,
    pub search: Option<String>,
}
