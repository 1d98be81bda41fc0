use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::AnnouncementService;
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    announcements::{
        entities::Audience,
        requests::{AnnouncementListParams, AnnouncementVisibility},
    },
    users::entities::User,
};
use crate::services::{current_user, storage_error_response};
use crate::storage::Storage;

/// 计算用户可见的公告范围
pub(crate) async fn visibility_for(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<AnnouncementVisibility> {
    let audiences = Audience::visible_to(user.role).to_vec();
    if user.role.is_admin() {
        return Ok(AnnouncementVisibility {
            audiences,
            class_ids: Vec::new(),
            all_classes: true,
        });
    }

    let class_ids = if user.role.is_student() {
        storage.list_student_class_ids(user.id).await?
    } else {
        storage.list_teacher_class_ids(user.id).await?
    };
    Ok(AnnouncementVisibility {
        audiences,
        class_ids,
        all_classes: false,
    })
}

pub async fn list_announcements(
    service: &AnnouncementService,
    query: AnnouncementListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let visibility = match visibility_for(&storage, &user).await {
        Ok(visibility) => visibility,
        Err(e) => return Ok(storage_error_response("获取公告范围失败", e)),
    };

    let page = query.pagination.page.max(1) as u64;
    let size = query.pagination.size.clamp(1, 100) as u64;

    match storage
        .list_visible_announcements(visibility, page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Announcements retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取公告列表失败", e)),
    }
}
