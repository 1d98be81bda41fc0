use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use super::conflict::{Slot, check_slot};
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::{requests::UpdateScheduleRequest, responses::ScheduleResponse},
};
use crate::services::storage_error_response;

pub async fn update_schedule(
    service: &ScheduleService,
    id: i64,
    mut data: UpdateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let existing = match storage.get_schedule_by_id(id).await {
        Ok(Some(schedule)) => schedule,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ScheduleNotFound,
                "Schedule not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("获取课表失败", e)),
    };

    data.start_time = data.start_time.map(|t| t.trim().to_string());
    data.end_time = data.end_time.map(|t| t.trim().to_string());
    data.room = data.room.map(|r| r.trim().to_string());

    // 合并后的时段整体校验，排除自身
    let slot = Slot {
        class_id: data.class_id.unwrap_or(existing.class_id),
        day_of_week: data.day_of_week.unwrap_or(existing.day_of_week),
        start_time: data.start_time.clone().unwrap_or(existing.start_time),
        end_time: data.end_time.clone().unwrap_or(existing.end_time),
    };
    if let Err(resp) = check_slot(&storage, &slot, Some(id)).await {
        return Ok(resp);
    }

    match storage.update_schedule(id, data).await {
        Ok(Some(schedule)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(ScheduleResponse { schedule }, "课表更新成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ScheduleNotFound,
            "Schedule not found",
        ))),
        Err(e) => Ok(storage_error_response("更新课表失败", e)),
    }
}
