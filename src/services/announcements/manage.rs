use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{AnnouncementService, validate_announcement_text};
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{
        entities::Announcement, requests::UpdateAnnouncementRequest,
        responses::AnnouncementResponse,
    },
    users::entities::User,
};
use crate::services::{current_user, storage_error_response};
use crate::storage::Storage;

/// 只有作者或管理员可以修改公告
async fn load_own_announcement(
    storage: &Arc<dyn Storage>,
    user: &User,
    id: i64,
) -> Result<Announcement, HttpResponse> {
    match storage.get_announcement_by_id(id).await {
        Ok(Some(announcement)) if user.role.is_admin() || announcement.author_id == user.id => {
            Ok(announcement)
        }
        Ok(Some(_)) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the author or an admin can modify this announcement",
        ))),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        ))),
        Err(e) => Err(storage_error_response("获取公告失败", e)),
    }
}

pub async fn update_announcement(
    service: &AnnouncementService,
    id: i64,
    mut data: UpdateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let existing = match load_own_announcement(&storage, &user, id).await {
        Ok(announcement) => announcement,
        Err(resp) => return Ok(resp),
    };

    data.title = data.title.map(|t| t.trim().to_string());
    data.content = data.content.map(|c| c.trim().to_string());
    let title = data.title.as_deref().unwrap_or(&existing.title);
    let content = data.content.as_deref().unwrap_or(&existing.content);
    if let Err(msg) = validate_announcement_text(title, content) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AnnouncementInvalid, msg)));
    }

    match storage.update_announcement(id, data).await {
        Ok(Some(announcement)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AnnouncementResponse { announcement },
            "公告更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        ))),
        Err(e) => Ok(storage_error_response("更新公告失败", e)),
    }
}

pub async fn delete_announcement(
    service: &AnnouncementService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_own_announcement(&storage, &user, id).await {
        return Ok(resp);
    }

    match storage.delete_announcement(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("公告删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        ))),
        Err(e) => Ok(storage_error_response("删除公告失败", e)),
    }
}
