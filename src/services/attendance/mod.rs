pub mod check_in;
pub mod detail;
pub mod records;
pub mod sessions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::ClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{
        entities::AttendanceSession,
        requests::{BulkAttendanceRequest, CreateSessionRequest},
    },
    classes::entities::Class,
    users::entities::User,
};
use crate::services::{class_access_for, storage_error_response};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

/// 读取考勤场次并校验访问权限
pub(crate) async fn load_session(
    storage: &Arc<dyn Storage>,
    user: &User,
    session_id: i64,
    allow_students: bool,
) -> Result<(AttendanceSession, Class, ClassAccess), HttpResponse> {
    let (session, class) = match storage.get_session_with_class(session_id).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AttendanceSessionNotFound,
                "Attendance session not found",
            )));
        }
        Err(e) => return Err(storage_error_response("获取考勤场次失败", e)),
    };

    match class_access_for(storage, user, &class, allow_students).await {
        Ok(Some(access)) => Ok((session, class, access)),
        Ok(None) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You do not have access to this attendance session",
        ))),
        Err(e) => Err(storage_error_response("检查班级权限失败", e)),
    }
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_session(
        &self,
        topic_id: i64,
        data: CreateSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::create_session(self, topic_id, data, request).await
    }

    pub async fn list_sessions(
        &self,
        topic_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::list_sessions(self, topic_id, request).await
    }

    pub async fn get_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_session(self, session_id, request).await
    }

    pub async fn delete_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sessions::delete_session(self, session_id, request).await
    }

    pub async fn check_in(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        check_in::check_in(self, session_id, request).await
    }

    pub async fn record_attendance(
        &self,
        session_id: i64,
        data: BulkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        records::record_attendance(self, session_id, data, request).await
    }
}
