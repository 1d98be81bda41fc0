use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse,
    classes::requests::{ClassListParams, ClassListQuery},
    users::entities::User,
};
use crate::services::{current_user, storage_error_response};

/// 按角色限定列表范围：教师只看自己执教的班级，学生只看已选的班级
pub(crate) fn scoped_query(user: &User, params: ClassListParams) -> ClassListQuery {
    let mut query = ClassListQuery {
        page: Some(params.pagination.page),
        size: Some(params.pagination.size),
        subject_id: params.subject_id,
        teacher_id: params.teacher_id,
        homeroom_id: params.homeroom_id,
        student_id: None,
        search: params.search,
    };
    if user.role.is_teacher() {
        query.teacher_id = Some(user.id);
    } else if user.role.is_student() {
        query.teacher_id = None;
        query.student_id = Some(user.id);
    }
    query
}

pub async fn list_classes(
    service: &ClassService,
    params: ClassListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage
        .list_classes_with_pagination(scoped_query(&user, params))
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取班级列表失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("u{id}"),
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

    fn params() -> ClassListParams {
        ClassListParams {
            pagination: PaginationQuery { page: 1, size: 20 },
            subject_id: Some(4),
            teacher_id: Some(99),
            homeroom_id: None,
            search: None,
        }
    }

    #[test]
    fn test_scoped_query_by_role() {
        let admin = scoped_query(&user(1, UserRole::Admin), params());
        assert_eq!(admin.teacher_id, Some(99));
        assert_eq!(admin.student_id, None);

        let teacher = scoped_query(&user(2, UserRole::WaliKelas), params());
        assert_eq!(teacher.teacher_id, Some(2));
        assert_eq!(teacher.subject_id, Some(4));

        let student = scoped_query(&user(3, UserRole::Siswa), params());
        assert_eq!(student.teacher_id, None);
        assert_eq!(student.student_id, Some(3));
    }
}
