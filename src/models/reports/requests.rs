use serde::Deserialize;
use ts_rs::TS;

// 考勤报表时间窗口（YYYY-MM-DD，含首尾）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AttendanceReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}
