//! 课表时段校验与冲突检测
//!
//! 时段按左闭右开处理，相邻时段（08:00-09:00 与 09:00-10:00）不冲突。
//! `HH:MM` 为定长字符串，可直接按字典序比较。

use actix_web::HttpResponse;
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode, classes::entities::Class, schedules::responses::ScheduleEntry,
};
use crate::services::storage_error_response;
use crate::storage::Storage;
use crate::utils::validate::validate_time;

/// 待检测的时段
#[derive(Debug, Clone)]
pub struct Slot {
    pub class_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
}

pub fn validate_slot(slot: &Slot) -> Result<(), &'static str> {
    if !(1..=7).contains(&slot.day_of_week) {
        return Err("day_of_week must be between 1 (Monday) and 7 (Sunday)");
    }
    validate_time(&slot.start_time)?;
    validate_time(&slot.end_time)?;
    if slot.start_time >= slot.end_time {
        return Err("start_time must be before end_time");
    }
    Ok(())
}

pub fn overlaps(start_a: &str, end_a: &str, start_b: &str, end_b: &str) -> bool {
    start_a < end_b && start_b < end_a
}

/// 查找与时段冲突的条目（同班级或同教师）
pub fn find_conflict<'a>(
    candidates: &'a [ScheduleEntry],
    slot: &Slot,
    teacher_id: i64,
    exclude_id: Option<i64>,
) -> Option<&'a ScheduleEntry> {
    candidates.iter().find(|entry| {
        let s = &entry.schedule;
        Some(s.id) != exclude_id
            && s.day_of_week == slot.day_of_week
            && (s.class_id == slot.class_id || entry.teacher_id == teacher_id)
            && overlaps(&slot.start_time, &slot.end_time, &s.start_time, &s.end_time)
    })
}

/// 校验时段并检查冲突；失败时返回可直接响应的错误
pub(crate) async fn check_slot(
    storage: &Arc<dyn Storage>,
    slot: &Slot,
    exclude_id: Option<i64>,
) -> Result<Class, HttpResponse> {
    if let Err(msg) = validate_slot(slot) {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ScheduleInvalid, msg)));
    }

    let class = match storage.get_class_by_id(slot.class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Err(storage_error_response("获取班级失败", e)),
    };

    let candidates = match storage
        .list_schedule_conflict_candidates(slot.day_of_week, class.id, class.teacher_id)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => return Err(storage_error_response("检查课表冲突失败", e)),
    };

    if let Some(entry) = find_conflict(&candidates, slot, class.teacher_id, exclude_id) {
        let reason = if entry.schedule.class_id == slot.class_id {
            "the class"
        } else {
            "the teacher"
        };
        return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ScheduleConflict,
            format!(
                "Overlaps with {} ({}-{}) for {}",
                entry.class_name, entry.schedule.start_time, entry.schedule.end_time, reason
            ),
        )));
    }

    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedules::entities::Schedule;
    use chrono::Utc;

    fn entry(id: i64, class_id: i64, teacher_id: i64, start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry {
            schedule: Schedule {
                id,
                class_id,
                day_of_week: 1,
                start_time: start.to_string(),
                end_time: end.to_string(),
                room: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            class_name: format!("Kelas {class_id}"),
            subject_name: "Matematika".to_string(),
            teacher_id,
            teacher_name: "Bu Sari".to_string(),
        }
    }

    fn slot(class_id: i64, start: &str, end: &str) -> Slot {
        Slot {
            class_id,
            day_of_week: 1,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        assert!(!overlaps("08:00", "09:00", "09:00", "10:00"));
        assert!(!overlaps("09:00", "10:00", "08:00", "09:00"));
        assert!(overlaps("08:00", "09:30", "09:00", "10:00"));
        assert!(overlaps("08:00", "12:00", "09:00", "10:00"));
    }

    #[test]
    fn test_conflict_by_class_or_teacher() {
        let existing = vec![entry(1, 10, 100, "08:00", "09:30")];
        // 同一班级
        assert!(find_conflict(&existing, &slot(10, "09:00", "10:00"), 200, None).is_some());
        // 同一教师，不同班级
        assert!(find_conflict(&existing, &slot(11, "09:00", "10:00"), 100, None).is_some());
        // 不同班级不同教师
        assert!(find_conflict(&existing, &slot(11, "09:00", "10:00"), 200, None).is_none());
        // 紧邻时段
        assert!(find_conflict(&existing, &slot(10, "09:30", "10:30"), 100, None).is_none());
    }

    #[test]
    fn test_update_excludes_itself() {
        let existing = vec![entry(1, 10, 100, "08:00", "09:30")];
        assert!(find_conflict(&existing, &slot(10, "08:30", "09:30"), 100, Some(1)).is_none());
    }

    #[test]
    fn test_validate_slot() {
        assert!(validate_slot(&slot(1, "07:00", "08:30")).is_ok());
        assert!(validate_slot(&slot(1, "08:30", "08:30")).is_err());
        assert!(validate_slot(&slot(1, "7:00", "08:30")).is_err());
        let mut sunday = slot(1, "07:00", "08:00");
        sunday.day_of_week = 7;
        assert!(validate_slot(&sunday).is_ok());
        sunday.day_of_week = 8;
        assert!(validate_slot(&sunday).is_err());
    }
}
