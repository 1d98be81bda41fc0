use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{HomeroomService, load_managed_homeroom};
use crate::models::{
    ApiResponse, ErrorCode,
    homerooms::{
        entities::{Homeroom, StudentNote},
        requests::{CreateNoteRequest, NoteListParams, UpdateNoteRequest},
        responses::{NoteListResponse, NoteResponse},
    },
    users::entities::UserRole,
};
use crate::services::{current_user, storage_error_response};
use crate::storage::Storage;

const MAX_NOTE_LENGTH: usize = 2000;

fn validate_content(content: &str) -> Result<(), &'static str> {
    let len = content.trim().chars().count();
    if len == 0 {
        return Err("Note content must not be empty");
    }
    if len > MAX_NOTE_LENGTH {
        return Err("Note content is too long");
    }
    Ok(())
}

/// 备注对象必须是该行政班的学生
async fn ensure_student_in_homeroom(
    storage: &Arc<dyn Storage>,
    homeroom: &Homeroom,
    student_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(student_id).await {
        Ok(Some(student))
            if student.role == UserRole::Siswa && student.homeroom_id == Some(homeroom.id) =>
        {
            Ok(())
        }
        Ok(_) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::StudentNotInHomeroom,
            "Student does not belong to this homeroom",
        ))),
        Err(e) => Err(storage_error_response("获取学生失败", e)),
    }
}

/// 读取属于该行政班的备注
async fn load_note(
    storage: &Arc<dyn Storage>,
    homeroom_id: i64,
    note_id: i64,
) -> Result<StudentNote, HttpResponse> {
    match storage.get_note_by_id(note_id).await {
        Ok(Some(note)) if note.homeroom_id == homeroom_id => Ok(note),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NoteNotFound,
            "Note not found",
        ))),
        Err(e) => Err(storage_error_response("获取备注失败", e)),
    }
}

pub async fn list_notes(
    service: &HomeroomService,
    id: i64,
    query: NoteListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_managed_homeroom(&storage, &user, id).await {
        return Ok(resp);
    }

    match storage.list_notes(id, query.student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            NoteListResponse { items },
            "Notes retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取备注失败", e)),
    }
}

pub async fn create_note(
    service: &HomeroomService,
    id: i64,
    data: CreateNoteRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Err(msg) = validate_content(&data.content) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::NoteInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;
    let homeroom = match load_managed_homeroom(&storage, &user, id).await {
        Ok(homeroom) => homeroom,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_student_in_homeroom(&storage, &homeroom, data.student_id).await {
        return Ok(resp);
    }

    match storage.create_note(id, user.id, data).await {
        Ok(note) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(NoteResponse { note }, "备注创建成功"))),
        Err(e) => Ok(storage_error_response("创建备注失败", e)),
    }
}

pub async fn update_note(
    service: &HomeroomService,
    id: i64,
    note_id: i64,
    data: UpdateNoteRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if let Some(content) = &data.content
        && let Err(msg) = validate_content(content)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::NoteInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_managed_homeroom(&storage, &user, id).await {
        return Ok(resp);
    }
    if let Err(resp) = load_note(&storage, id, note_id).await {
        return Ok(resp);
    }

    match storage.update_note(note_id, data).await {
        Ok(Some(note)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(NoteResponse { note }, "备注更新成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NoteNotFound,
            "Note not found",
        ))),
        Err(e) => Ok(storage_error_response("更新备注失败", e)),
    }
}

pub async fn delete_note(
    service: &HomeroomService,
    id: i64,
    note_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_managed_homeroom(&storage, &user, id).await {
        return Ok(resp);
    }
    if let Err(resp) = load_note(&storage, id, note_id).await {
        return Ok(resp);
    }

    match storage.delete_note(note_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("备注删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NoteNotFound,
            "Note not found",
        ))),
        Err(e) => Ok(storage_error_response("删除备注失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content() {
        assert!(validate_content("Rajin mengerjakan tugas").is_ok());
        assert!(validate_content("   ").is_err());
        assert!(validate_content(&"a".repeat(MAX_NOTE_LENGTH + 1)).is_err());
    }
}
