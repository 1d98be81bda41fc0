use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ScheduleService;
use super::conflict::{Slot, check_slot};
use crate::models::{
    ApiResponse,
    schedules::{requests::CreateScheduleRequest, responses::ScheduleResponse},
};
use crate::services::storage_error_response;

pub async fn create_schedule(
    service: &ScheduleService,
    mut data: CreateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    data.start_time = data.start_time.trim().to_string();
    data.end_time = data.end_time.trim().to_string();
    data.room = data
        .room
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let slot = Slot {
        class_id: data.class_id,
        day_of_week: data.day_of_week,
        start_time: data.start_time.clone(),
        end_time: data.end_time.clone(),
    };
    if let Err(resp) = check_slot(&storage, &slot, None).await {
        return Ok(resp);
    }

    match storage.create_schedule(data).await {
        Ok(schedule) => {
            info!(
                "课表 {} 已创建：班级 {} 周{} {}-{}",
                schedule.id,
                schedule.class_id,
                schedule.day_of_week,
                schedule.start_time,
                schedule.end_time
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(ScheduleResponse { schedule }, "课表创建成功")))
        }
        Err(e) => Ok(storage_error_response("创建课表失败", e)),
    }
}
