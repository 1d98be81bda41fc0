pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod quiz;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::ClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    classes::entities::Class,
    users::entities::User,
};
use crate::services::{class_access_for, storage_error_response};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

/// 读取作业并校验当前用户对其所属班级的访问权限
pub(crate) async fn load_assignment(
    storage: &Arc<dyn Storage>,
    user: &User,
    assignment_id: i64,
    allow_students: bool,
) -> Result<(Assignment, Class, ClassAccess), HttpResponse> {
    let (assignment, class) = match storage.get_assignment_with_class(assignment_id).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Err(storage_error_response("获取作业失败", e)),
    };

    match class_access_for(storage, user, &class, allow_students).await {
        Ok(Some(access)) => Ok((assignment, class, access)),
        Ok(None) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You do not have access to this assignment",
        ))),
        Err(e) => Err(storage_error_response("检查班级权限失败", e)),
    }
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_assignment(
        &self,
        topic_id: i64,
        data: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, topic_id, data, request).await
    }

    pub async fn list_assignments(
        &self,
        topic_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, topic_id, request).await
    }

    pub async fn get_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, assignment_id, request).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        data: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, assignment_id, data, request).await
    }

    pub async fn delete_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, assignment_id, request).await
    }
}
