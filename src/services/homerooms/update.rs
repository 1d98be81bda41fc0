use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::create::validate_homeroom_fields;
use super::{HomeroomService, check_homeroom_teacher};
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode,
    homerooms::{requests::UpdateHomeroomRequest, responses::HomeroomResponse},
};
use crate::services::storage_error_response;

pub async fn update_homeroom(
    service: &HomeroomService,
    id: i64,
    mut data: UpdateHomeroomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    data.name = data.name.map(|n| n.trim().to_string());
    if let Err(msg) = validate_homeroom_fields(
        data.name.as_deref(),
        data.grade_level,
        data.academic_year.as_deref(),
    ) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;

    if !data.clear_homeroom_teacher
        && let Some(teacher_id) = data.homeroom_teacher_id
        && let Err(resp) = check_homeroom_teacher(&storage, teacher_id, Some(id)).await
    {
        return Ok(resp);
    }

    match storage.update_homeroom(id, data).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::HomeroomNotFound,
                "Homeroom not found",
            )));
        }
        Err(LmsError::Conflict(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::HomeroomAlreadyExists,
                "Homeroom name already exists",
            )));
        }
        Err(e) => return Ok(storage_error_response("更新行政班失败", e)),
    }

    match storage.get_homeroom_detail(id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            HomeroomResponse { homeroom: detail },
            "行政班更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::HomeroomNotFound,
            "Homeroom not found",
        ))),
        Err(e) => Ok(storage_error_response("获取行政班失败", e)),
    }
}
