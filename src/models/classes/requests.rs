use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::{PaginationQuery, pagination::deserialize_option_string_to_i64};

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_option_string_to_i64")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_string_to_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_string_to_i64")]
    pub homeroom_id: Option<i64>,
    pub search: Option<String>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub homeroom_id: Option<i64>,
    /// 仅列出该学生所在的班级
    pub student_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub name: String,
    pub subject_id: i64,
    /// 管理员创建时必填；教师创建时忽略，使用当前用户
    pub teacher_id: Option<i64>,
    pub homeroom_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub homeroom_id: Option<i64>,
    pub description: Option<String>,
}

// 批量添加学生
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct EnrollStudentsRequest {
    pub student_ids: Vec<i64>,
}
