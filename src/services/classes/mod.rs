pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod members;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::{
        ClassListParams, CreateClassRequest, EnrollStudentsRequest, UpdateClassRequest,
    },
    users::entities::User,
};
use crate::services::storage_error_response;
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

/// 任课教师必须存在且为 guru 或 wali_kelas
pub(crate) async fn check_class_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<User, HttpResponse> {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.role.is_teacher() => Ok(user),
        Ok(_) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassTeacherInvalid,
            "Class teacher must be a user with role guru or wali_kelas",
        ))),
        Err(e) => Err(storage_error_response("获取教师失败", e)),
    }
}

/// 校验科目与行政班存在
pub(crate) async fn check_class_references(
    storage: &Arc<dyn Storage>,
    subject_id: Option<i64>,
    homeroom_id: Option<i64>,
) -> Result<(), HttpResponse> {
    if let Some(subject_id) = subject_id {
        match storage.get_subject_by_id(subject_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SubjectNotFound,
                    "Subject not found",
                )));
            }
            Err(e) => return Err(storage_error_response("获取科目失败", e)),
        }
    }
    if let Some(homeroom_id) = homeroom_id {
        match storage.get_homeroom_by_id(homeroom_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::HomeroomNotFound,
                    "Homeroom not found",
                )));
            }
            Err(e) => return Err(storage_error_response("获取行政班失败", e)),
        }
    }
    Ok(())
}

pub(crate) fn validate_class_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 || len > 100 {
        return Err("Class name must be 1 to 100 characters");
    }
    Ok(())
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_classes(
        &self,
        query: ClassListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, query, request).await
    }

    pub async fn create_class(
        &self,
        data: CreateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, data, request).await
    }

    pub async fn get_class(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_class(self, request).await
    }

    pub async fn update_class(
        &self,
        data: UpdateClassRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, data, request).await
    }

    pub async fn delete_class(
        &self,
        class_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, class_id, request).await
    }

    // 班级成员
    pub async fn list_members(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        members::list_members(self, request).await
    }

    pub async fn enroll_students(
        &self,
        data: EnrollStudentsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::enroll_students(self, data, request).await
    }

    pub async fn enroll_homeroom(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        members::enroll_homeroom(self, request).await
    }

    pub async fn remove_member(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::remove_member(self, student_id, request).await
    }
}
