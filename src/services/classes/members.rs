use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::middlewares::RequireClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::{
        entities::Class,
        requests::EnrollStudentsRequest,
        responses::{ClassMemberListResponse, EnrollStudentsResponse},
    },
};
use crate::services::homerooms::students::invalid_student_ids;
use crate::services::storage_error_response;

fn class_from_request(request: &HttpRequest) -> Result<Class, HttpResponse> {
    RequireClassAccess::extract_class(request).ok_or_else(|| {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))
    })
}

fn enrolled_response(result: EnrollStudentsResponse) -> HttpResponse {
    let message = format!(
        "Enrolled {} students, skipped {}",
        result.enrolled.len(),
        result.skipped.len()
    );
    HttpResponse::Ok().json(ApiResponse::success(result, message))
}

pub async fn list_members(
    service: &ClassService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.list_class_members(class.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassMemberListResponse { items },
            "Class members retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取班级成员失败", e)),
    }
}

pub async fn enroll_students(
    service: &ClassService,
    data: EnrollStudentsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    if data.student_ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassMemberInvalid,
            "student_ids must not be empty",
        )));
    }

    let storage = service.get_storage(request)?;

    // 只能添加学生
    let users = match storage.get_users_by_ids(&data.student_ids).await {
        Ok(users) => users,
        Err(e) => return Ok(storage_error_response("获取学生失败", e)),
    };
    let invalid = invalid_student_ids(&data.student_ids, &users);
    if !invalid.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassMemberInvalid,
            format!("Not students: {invalid:?}"),
        )));
    }

    match storage.enroll_students(class.id, &data.student_ids).await {
        Ok(result) => Ok(enrolled_response(result)),
        Err(e) => Ok(storage_error_response("添加学生失败", e)),
    }
}

/// 将班级关联行政班的全部学生加入班级
pub async fn enroll_homeroom(
    service: &ClassService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let Some(homeroom_id) = class.homeroom_id else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassInvalid,
            "Class is not attached to a homeroom",
        )));
    };

    let storage = service.get_storage(request)?;
    let student_ids: Vec<i64> = match storage.list_homeroom_students(homeroom_id).await {
        Ok(students) => students.into_iter().map(|s| s.id).collect(),
        Err(e) => return Ok(storage_error_response("获取行政班学生失败", e)),
    };

    match storage.enroll_students(class.id, &student_ids).await {
        Ok(result) => Ok(enrolled_response(result)),
        Err(e) => Ok(storage_error_response("添加学生失败", e)),
    }
}

pub async fn remove_member(
    service: &ClassService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.remove_class_member(class.id, student_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("学生已移出班级"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassMemberNotFound,
            "Student is not a member of this class",
        ))),
        Err(e) => Ok(storage_error_response("移除学生失败", e)),
    }
}
