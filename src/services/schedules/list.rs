use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::{requests::ScheduleListQuery, responses::ScheduleListResponse},
};
use crate::services::{current_user, storage_error_response};

pub async fn list_schedules(
    service: &ScheduleService,
    query: ScheduleListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(day) = query.day
        && !(1..=7).contains(&day)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ScheduleInvalid,
            "day must be between 1 and 7",
        )));
    }

    let storage = service.get_storage(request)?;
    match storage.list_schedules(query, None).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleListResponse { items },
            "Schedules retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取课表失败", e)),
    }
}

/// 当前用户的一周课表：教师为执教班级，学生为已选班级
pub async fn my_schedule(
    service: &ScheduleService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let class_ids = if user.role.is_student() {
        storage.list_student_class_ids(user.id).await
    } else {
        storage.list_teacher_class_ids(user.id).await
    };
    let class_ids = match class_ids {
        Ok(ids) => ids,
        Err(e) => return Ok(storage_error_response("获取班级失败", e)),
    };

    // 存储层按星期、开始时间排序
    match storage
        .list_schedules(ScheduleListQuery::default(), Some(class_ids))
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleListResponse { items },
            "Schedule retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取课表失败", e)),
    }
}
