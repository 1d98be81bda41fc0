use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::ApiResponse;
use crate::services::storage_error_response;

pub async fn get_stats(service: &AdminService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_admin_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Statistics retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取统计数据失败", e)),
    }
}
