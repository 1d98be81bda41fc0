use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DashboardService, local_today};
use crate::models::{
    ApiResponse,
    classes::requests::ClassListQuery,
    dashboard::responses::StudentDashboardResponse,
    schedules::requests::ScheduleListQuery,
};
use crate::services::announcements::list::visibility_for;
use crate::services::{current_user, storage_error_response};

const LATEST_ANNOUNCEMENTS: u64 = 5;

pub async fn student_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let (weekday, _) = local_today();

    let classes = match storage
        .list_class_details(ClassListQuery {
            student_id: Some(user.id),
            ..Default::default()
        })
        .await
    {
        Ok(classes) => classes,
        Err(e) => return Ok(storage_error_response("获取班级失败", e)),
    };
    let class_ids: Vec<i64> = classes.iter().map(|c| c.class.id).collect();

    let upcoming_assignments = match storage
        .list_upcoming_assignments(user.id, chrono::Utc::now().timestamp())
        .await
    {
        Ok(items) => items,
        Err(e) => return Ok(storage_error_response("获取待完成作业失败", e)),
    };

    let today_query = ScheduleListQuery {
        day: Some(weekday),
        ..Default::default()
    };
    let today_schedule = match storage.list_schedules(today_query, Some(class_ids)).await {
        Ok(items) => items,
        Err(e) => return Ok(storage_error_response("获取今日课表失败", e)),
    };

    let announcements = match visibility_for(&storage, &user).await {
        Ok(visibility) => {
            match storage
                .list_visible_announcements(visibility, 1, LATEST_ANNOUNCEMENTS)
                .await
            {
                Ok(page) => page.items,
                Err(e) => return Ok(storage_error_response("获取公告失败", e)),
            }
        }
        Err(e) => return Ok(storage_error_response("获取公告范围失败", e)),
    };

    let attendance = match storage.student_attendance_totals(user.id).await {
        Ok(totals) => totals,
        Err(e) => return Ok(storage_error_response("获取考勤汇总失败", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentDashboardResponse {
            classes,
            upcoming_assignments,
            today_schedule,
            announcements,
            attendance,
        },
        "Dashboard retrieved successfully",
    )))
}
