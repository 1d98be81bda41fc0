use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::{HomeroomService, load_managed_homeroom};
use crate::models::{
    ApiResponse, ErrorCode,
    homerooms::{
        requests::AssignStudentsRequest,
        responses::{AssignStudentsResponse, HomeroomStudentsResponse},
    },
    users::entities::{User, UserRole},
};
use crate::services::{current_user, storage_error_response};

/// 找出不是学生（或不存在）的 ID
pub(crate) fn invalid_student_ids(requested: &[i64], found: &[User]) -> Vec<i64> {
    let students: HashSet<i64> = found
        .iter()
        .filter(|u| u.role == UserRole::Siswa)
        .map(|u| u.id)
        .collect();
    let mut invalid: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|id| !students.contains(id))
        .collect();
    invalid.sort_unstable();
    invalid.dedup();
    invalid
}

pub async fn list_students(
    service: &HomeroomService,
    id: i64,
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

    match storage.list_homeroom_students(id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            HomeroomStudentsResponse { items },
            "Homeroom students retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取行政班学生失败", e)),
    }
}

pub async fn assign_students(
    service: &HomeroomService,
    id: i64,
    data: AssignStudentsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if data.student_ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "student_ids must not be empty",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.get_homeroom_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::HomeroomNotFound,
                "Homeroom not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("获取行政班失败", e)),
    }

    let users = match storage.get_users_by_ids(&data.student_ids).await {
        Ok(users) => users,
        Err(e) => return Ok(storage_error_response("获取学生失败", e)),
    };
    let invalid = invalid_student_ids(&data.student_ids, &users);
    if !invalid.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Not students: {invalid:?}"),
        )));
    }

    match storage.assign_students_to_homeroom(id, &data.student_ids).await {
        Ok(assigned) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignStudentsResponse { assigned },
            "学生分配成功",
        ))),
        Err(e) => Ok(storage_error_response("分配学生失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: None,
            password_hash: String::new(),
            full_name: format!("User {id}"),
            role,
            status: UserStatus::Active,
            nis_nip: None,
            homeroom_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_invalid_student_ids() {
        let found = vec![user(1, UserRole::Siswa), user(2, UserRole::Guru)];
        assert_eq!(invalid_student_ids(&[1, 2, 3, 3], &found), vec![2, 3]);
        assert!(invalid_student_ids(&[1], &found).is_empty());
    }
}
