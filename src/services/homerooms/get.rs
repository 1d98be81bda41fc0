use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{HomeroomService, load_managed_homeroom};
use crate::models::{ApiResponse, ErrorCode, homerooms::responses::HomeroomResponse};
use crate::services::{current_user, storage_error_response};

pub async fn get_homeroom(
    service: &HomeroomService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed_homeroom(&storage, &user, id).await {
        return Ok(resp);
    }

    match storage.get_homeroom_detail(id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            HomeroomResponse { homeroom: detail },
            "Homeroom retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::HomeroomNotFound,
            "Homeroom not found",
        ))),
        Err(e) => Ok(storage_error_response("获取行政班失败", e)),
    }
}
