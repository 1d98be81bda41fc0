use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, check_class_references, check_class_teacher, validate_class_name};
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{requests::CreateClassRequest, responses::ClassResponse},
};
use crate::services::{current_user, storage_error_response};

pub async fn create_class(
    service: &ClassService,
    mut data: CreateClassRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    data.name = data.name.trim().to_string();
    if let Err(msg) = validate_class_name(&data.name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ClassInvalid, msg)));
    }

    // 管理员需指定教师，教师只能为自己创建
    let teacher_id = if user.role.is_admin() {
        match data.teacher_id {
            Some(id) => id,
            None => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ClassTeacherInvalid,
                    "teacher_id is required",
                )));
            }
        }
    } else {
        user.id
    };

    let storage = service.get_storage(request)?;

    if let Err(resp) = check_class_teacher(&storage, teacher_id).await {
        return Ok(resp);
    }
    if let Err(resp) =
        check_class_references(&storage, Some(data.subject_id), data.homeroom_id).await
    {
        return Ok(resp);
    }

    let class = match storage.create_class(teacher_id, data).await {
        Ok(class) => class,
        Err(e) => return Ok(storage_error_response("创建班级失败", e)),
    };
    tracing::info!("Class {} created by user {}", class.id, user.id);

    match storage.get_class_detail(class.id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            ClassResponse { class: detail },
            "班级创建成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))),
        Err(e) => Ok(storage_error_response("获取班级失败", e)),
    }
}
