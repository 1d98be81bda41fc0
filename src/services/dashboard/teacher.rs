use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{DashboardService, local_today};
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    attendance::entities::AttendanceTotals,
    classes::requests::ClassListQuery,
    dashboard::responses::{HomeroomSummary, TeacherDashboardResponse},
    schedules::requests::ScheduleListQuery,
};
use crate::services::{current_user, storage_error_response};
use crate::storage::Storage;

/// 班主任所带行政班的概况及今日每日考勤汇总
async fn homeroom_summary(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
    today: &str,
) -> Result<Option<HomeroomSummary>> {
    let Some(homeroom) = storage.get_homeroom_by_teacher(teacher_id).await? else {
        return Ok(None);
    };
    let Some(detail) = storage.get_homeroom_detail(homeroom.id).await? else {
        return Ok(None);
    };
    let today_attendance: AttendanceTotals = storage
        .list_daily_attendance(homeroom.id, today)
        .await?
        .into_iter()
        .map(|record| record.status)
        .collect();

    Ok(Some(HomeroomSummary {
        homeroom: detail,
        today: today.to_string(),
        today_attendance,
    }))
}

pub async fn teacher_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let (weekday, today) = local_today();

    let classes = match storage
        .list_class_details(ClassListQuery {
            teacher_id: Some(user.id),
            ..Default::default()
        })
        .await
    {
        Ok(classes) => classes,
        Err(e) => return Ok(storage_error_response("获取执教班级失败", e)),
    };
    let class_ids: Vec<i64> = classes.iter().map(|c| c.class.id).collect();

    let pending_submissions = match storage.list_pending_submissions(user.id).await {
        Ok(items) => items,
        Err(e) => return Ok(storage_error_response("获取待批改提交失败", e)),
    };

    let today_query = ScheduleListQuery {
        day: Some(weekday),
        ..Default::default()
    };
    let today_schedule = match storage.list_schedules(today_query, Some(class_ids)).await {
        Ok(items) => items,
        Err(e) => return Ok(storage_error_response("获取今日课表失败", e)),
    };

    let homeroom = match homeroom_summary(&storage, user.id, &today).await {
        Ok(summary) => summary,
        Err(e) => return Ok(storage_error_response("获取行政班概况失败", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TeacherDashboardResponse {
            classes,
            pending_submissions,
            today_schedule,
            homeroom,
        },
        "Dashboard retrieved successfully",
    )))
}
