use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程班级：某位教师向一组学生讲授某个科目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub homeroom_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 当前用户对某个班级的访问级别
///
/// 由 RequireClassAccess 中间件写入请求扩展。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub enum ClassAccess {
    Admin,
    Teacher,
    Student,
}

impl ClassAccess {
    /// 是否可以修改班级内容（管理员或任课教师）
    pub fn can_manage(&self) -> bool {
        matches!(self, ClassAccess::Admin | ClassAccess::Teacher)
    }
}
