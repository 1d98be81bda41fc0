use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 考勤状态：出勤、请假、病假、缺勤
    AttendanceStatus("../frontend/src/types/generated/attendance.ts") {
        Hadir => "hadir",
        Izin => "izin",
        Sakit => "sakit",
        Alpa => "alpa",
    }
}

// 网课考勤场次，隶属于某个主题
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSession {
    pub id: i64,
    pub topic_id: i64,
    pub title: String,
    pub opens_at: chrono::DateTime<chrono::Utc>,
    pub closes_at: chrono::DateTime<chrono::Utc>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl AttendanceSession {
    /// 签到窗口是否开放（左闭右开）
    pub fn is_open_at(&self, at: chrono::DateTime<chrono::Utc>) -> bool {
        self.opens_at <= at && at < self.closes_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    /// 学生自行签到时为空
    pub recorded_by: Option<i64>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

// 每日考勤（行政班）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct DailyAttendance {
    pub id: i64,
    pub homeroom_id: i64,
    pub student_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub recorded_by: i64,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

// 各状态计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceTotals {
    pub hadir: i64,
    pub izin: i64,
    pub sakit: i64,
    pub alpa: i64,
}

impl AttendanceTotals {
    pub fn add(&mut self, status: AttendanceStatus, count: i64) {
        match status {
            AttendanceStatus::Hadir => self.hadir += count,
            AttendanceStatus::Izin => self.izin += count,
            AttendanceStatus::Sakit => self.sakit += count,
            AttendanceStatus::Alpa => self.alpa += count,
        }
    }

    pub fn total(&self) -> i64 {
        self.hadir + self.izin + self.sakit + self.alpa
    }
}

impl FromIterator<AttendanceStatus> for AttendanceTotals {
    fn from_iter<I: IntoIterator<Item = AttendanceStatus>>(iter: I) -> Self {
        let mut totals = AttendanceTotals::default();
        for status in iter {
            totals.add(status, 1);
        }
        totals
    }
}

/// 批量记录中的一条（存储层写入参数）
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceMark {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_totals_from_statuses() {
        let totals: AttendanceTotals = [
            AttendanceStatus::Hadir,
            AttendanceStatus::Hadir,
            AttendanceStatus::Sakit,
            AttendanceStatus::Alpa,
        ]
        .into_iter()
        .collect();
        assert_eq!(totals.hadir, 2);
        assert_eq!(totals.izin, 0);
        assert_eq!(totals.sakit, 1);
        assert_eq!(totals.alpa, 1);
        assert_eq!(totals.total(), 4);
    }

    #[test]
    fn test_session_window_is_half_open() {
        let opens = Utc.with_ymd_and_hms(2025, 8, 1, 7, 0, 0).unwrap();
        let closes = Utc.with_ymd_and_hms(2025, 8, 1, 8, 0, 0).unwrap();
        let session = AttendanceSession {
            id: 1,
            topic_id: 1,
            title: "Pertemuan 1".to_string(),
            opens_at: opens,
            closes_at: closes,
            created_by: 1,
            created_at: opens,
        };
        assert!(session.is_open_at(opens));
        assert!(!session.is_open_at(closes));
        assert!(!session.is_open_at(opens - chrono::Duration::seconds(1)));
    }
}
