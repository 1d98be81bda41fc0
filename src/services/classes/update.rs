use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, check_class_references, check_class_teacher, validate_class_name};
use crate::middlewares::{ClassAccess, RequireClassAccess};
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{requests::UpdateClassRequest, responses::ClassResponse},
};
use crate::services::storage_error_response;

pub async fn update_class(
    service: &ClassService,
    mut data: UpdateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(class), Some(access)) = (
        RequireClassAccess::extract_class(request),
        RequireClassAccess::extract_access(request),
    ) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "No access to this class",
        )));
    };

    data.name = data.name.map(|n| n.trim().to_string());
    if let Some(name) = &data.name
        && let Err(msg) = validate_class_name(name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ClassInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    // 只有管理员可以更换任课教师
    if let Some(teacher_id) = data.teacher_id
        && teacher_id != class.teacher_id
    {
        if access != ClassAccess::Admin {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "Only admin can change the class teacher",
            )));
        }
        if let Err(resp) = check_class_teacher(&storage, teacher_id).await {
            return Ok(resp);
        }
    }
    if let Err(resp) = check_class_references(&storage, data.subject_id, data.homeroom_id).await {
        return Ok(resp);
    }

    match storage.update_class(class.id, data).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("更新班级失败", e)),
    }

    match storage.get_class_detail(class.id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassResponse { class: detail },
            "班级更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(storage_error_response("获取班级失败", e)),
    }
}
