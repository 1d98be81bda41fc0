pub mod attendance_recap;
pub mod create;
pub mod daily;
pub mod delete;
pub mod get;
pub mod grades;
pub mod list;
pub mod notes;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    attendance::requests::{DailyAttendanceQuery, DailyAttendanceRequest},
    homerooms::{
        entities::Homeroom,
        requests::{
            AssignStudentsRequest, CreateHomeroomRequest, CreateNoteRequest, HomeroomListParams,
            NoteListParams, UpdateHomeroomRequest, UpdateNoteRequest,
        },
    },
    users::entities::{User, UserRole},
};
use crate::services::storage_error_response;
use crate::storage::Storage;

pub struct HomeroomService {
    storage: Option<Arc<dyn Storage>>,
}

/// 读取行政班，仅允许管理员和该班班主任
pub(crate) async fn load_managed_homeroom(
    storage: &Arc<dyn Storage>,
    user: &User,
    homeroom_id: i64,
) -> Result<Homeroom, HttpResponse> {
    let homeroom = match storage.get_homeroom_by_id(homeroom_id).await {
        Ok(Some(homeroom)) => homeroom,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::HomeroomNotFound,
                "Homeroom not found",
            )));
        }
        Err(e) => return Err(storage_error_response("获取行政班失败", e)),
    };

    if user.role.is_admin() || homeroom.homeroom_teacher_id == Some(user.id) {
        Ok(homeroom)
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the homeroom teacher can access this homeroom",
        )))
    }
}

/// 校验班主任：必须是 wali_kelas，且未带其他行政班
pub(crate) async fn check_homeroom_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
    homeroom_id: Option<i64>,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.role == UserRole::WaliKelas => {}
        Ok(_) => {
            return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::HomeroomTeacherInvalid,
                "Homeroom teacher must be a user with role wali_kelas",
            )));
        }
        Err(e) => return Err(storage_error_response("获取班主任失败", e)),
    }

    match storage.get_homeroom_by_teacher(teacher_id).await {
        Ok(Some(other)) if Some(other.id) != homeroom_id => {
            Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::HomeroomTeacherTaken,
                format!("This teacher already leads homeroom {}", other.name),
            )))
        }
        Ok(_) => Ok(()),
        Err(e) => Err(storage_error_response("查询班主任行政班失败", e)),
    }
}

impl HomeroomService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_homerooms(
        &self,
        query: HomeroomListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_homerooms(self, query, request).await
    }

    pub async fn create_homeroom(
        &self,
        data: CreateHomeroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_homeroom(self, data, request).await
    }

    pub async fn get_homeroom(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_homeroom(self, id, request).await
    }

    pub async fn update_homeroom(
        &self,
        id: i64,
        data: UpdateHomeroomRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_homeroom(self, id, data, request).await
    }

    pub async fn delete_homeroom(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_homeroom(self, id, request).await
    }

    // 行政班学生
    pub async fn list_students(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        students::list_students(self, id, request).await
    }

    pub async fn assign_students(
        &self,
        id: i64,
        data: AssignStudentsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::assign_students(self, id, data, request).await
    }

    // 成绩汇总
    pub async fn grade_recap(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        grades::grade_recap(self, id, request).await
    }

    // 考勤汇总
    pub async fn attendance_recap(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        attendance_recap::attendance_recap(self, id, request).await
    }

    // 学生备注
    pub async fn list_notes(
        &self,
        id: i64,
        query: NoteListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notes::list_notes(self, id, query, request).await
    }

    pub async fn create_note(
        &self,
        id: i64,
        data: CreateNoteRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notes::create_note(self, id, data, request).await
    }

    pub async fn update_note(
        &self,
        id: i64,
        note_id: i64,
        data: UpdateNoteRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notes::update_note(self, id, note_id, data, request).await
    }

    pub async fn delete_note(
        &self,
        id: i64,
        note_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notes::delete_note(self, id, note_id, request).await
    }

    // 每日考勤
    pub async fn record_daily_attendance(
        &self,
        id: i64,
        data: DailyAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        daily::record_daily_attendance(self, id, data, request).await
    }

    pub async fn list_daily_attendance(
        &self,
        id: i64,
        query: DailyAttendanceQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        daily::list_daily_attendance(self, id, query, request).await
    }
}
