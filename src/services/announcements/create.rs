use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AnnouncementService, validate_announcement_text};
use crate::models::{
    ApiResponse, ErrorCode,
    announcements::{requests::CreateAnnouncementRequest, responses::AnnouncementResponse},
};
use crate::services::{current_user, storage_error_response};

/// 管理员可发布全局或班级公告；教师只能向自己执教的班级发布
pub async fn create_announcement(
    service: &AnnouncementService,
    mut data: CreateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    data.title = data.title.trim().to_string();
    data.content = data.content.trim().to_string();
    if let Err(msg) = validate_announcement_text(&data.title, &data.content) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AnnouncementInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    match data.class_id {
        Some(class_id) => {
            let class = match storage.get_class_by_id(class_id).await {
                Ok(Some(class)) => class,
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::ClassNotFound,
                        "Class not found",
                    )));
                }
                Err(e) => return Ok(storage_error_response("获取班级失败", e)),
            };
            if !user.role.is_admin() && class.teacher_id != user.id {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::ClassPermissionDenied,
                    "You can only post announcements to classes you teach",
                )));
            }
        }
        None if !user.role.is_admin() => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "Only admins can post global announcements",
            )));
        }
        None => {}
    }

    match storage.create_announcement(user.id, data).await {
        Ok(announcement) => {
            info!(
                "用户 {} 发布公告 {}（班级 {:?}，受众 {}）",
                user.id, announcement.id, announcement.class_id, announcement.audience
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                AnnouncementResponse { announcement },
                "公告发布成功",
            )))
        }
        Err(e) => Ok(storage_error_response("发布公告失败", e)),
    }
}
