/*!
 * 课程班级访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，并且路由路径中包含 `{class_id}`。
 *
 * - 管理员总是放行（[`ClassAccess::Admin`]）
 * - 班级的任课教师放行（[`ClassAccess::Teacher`]）
 * - 已选课学生仅在 [`RequireClassAccess::members`] 下放行（[`ClassAccess::Student`]）
 *
 * 通过后将访问级别和班级写入请求扩展：
 *
 * ```rust,ignore
 * web::scope("/{class_id}/topics")
 *     .route("", web::get().to(list_topics).wrap(RequireClassAccess::members()))
 *     .route("", web::post().to(create_topic).wrap(RequireClassAccess::managers()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{
        ErrorCode,
        classes::entities::Class,
        users::entities::{User, UserRole},
    },
    storage::Storage,
};

use super::create_error_response;

/// 当前用户对班级的访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassAccess {
    Admin,
    Teacher,
    Student,
}

impl ClassAccess {
    /// 是否可以管理班级内容
    pub fn can_manage(&self) -> bool {
        matches!(self, ClassAccess::Admin | ClassAccess::Teacher)
    }
}

/// 根据用户、班级和选课关系计算访问级别
pub fn resolve_access(
    user: &User,
    class: &Class,
    is_member: bool,
    allow_students: bool,
) -> Option<ClassAccess> {
    if user.role == UserRole::Admin {
        Some(ClassAccess::Admin)
    } else if user.role.is_teacher() && class.teacher_id == user.id {
        Some(ClassAccess::Teacher)
    } else if allow_students && user.role.is_student() && is_member {
        Some(ClassAccess::Student)
    } else {
        None
    }
}

#[derive(Clone)]
pub struct RequireClassAccess {
    allow_students: bool,
}

impl RequireClassAccess {
    /// 仅管理员与任课教师
    pub fn managers() -> Self {
        Self {
            allow_students: false,
        }
    }

    /// 管理员、任课教师与已选课学生
    pub fn members() -> Self {
        Self {
            allow_students: true,
        }
    }

    pub fn extract_access(req: &actix_web::HttpRequest) -> Option<ClassAccess> {
        req.extensions().get::<ClassAccess>().copied()
    }

    pub fn extract_class(req: &actix_web::HttpRequest) -> Option<Class> {
        req.extensions().get::<Class>().cloned()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassAccessMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassAccessMiddleware {
            service: Rc::new(service),
            allow_students: self.allow_students,
        }))
    }
}

pub struct RequireClassAccessMiddleware<S> {
    service: Rc<S>,
    allow_students: bool,
}

impl<S, B> Service<ServiceRequest> for RequireClassAccessMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allow_students = self.allow_students;

        Box::pin(async move {
            // 1. 当前用户
            let Some(user) = req.extensions().get::<User>().cloned() else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Unauthorized: missing user",
                    )
                    .map_into_right_body(),
                ));
            };

            // 2. class_id
            let Some(class_id) = req
                .match_info()
                .get("class_id")
                .and_then(|s| s.parse::<i64>().ok())
            else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::BadRequest,
                        "Missing or invalid class_id",
                    )
                    .map_into_right_body(),
                ));
            };

            let Some(storage) = req
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
            else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Storage not available",
                    )
                    .map_into_right_body(),
                ));
            };

            // 3. 班级
            let class = match storage.get_class_by_id(class_id).await {
                Ok(Some(class)) => class,
                Ok(None) => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::NOT_FOUND,
                            ErrorCode::ClassNotFound,
                            "Class not found",
                        )
                        .map_into_right_body(),
                    ));
                }
                Err(e) => {
                    error!("Failed to load class {}: {}", class_id, e);
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Failed to load class",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            // 4. 学生需查询选课关系
            let is_member = if allow_students && user.role.is_student() {
                match storage.is_class_member(class_id, user.id).await {
                    Ok(is_member) => is_member,
                    Err(e) => {
                        error!("Failed to check class membership: {}", e);
                        false
                    }
                }
            } else {
                false
            };

            match resolve_access(&user, &class, is_member, allow_students) {
                Some(access) => {
                    debug!("User {} accesses class {} as {:?}", user.id, class_id, access);
                    req.extensions_mut().insert(access);
                    req.extensions_mut().insert(class);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                None => Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::ClassPermissionDenied,
                        "No permission for this class",
                    )
                    .map_into_right_body(),
                )),
            }
        })
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

    fn class(teacher_id: i64) -> Class {
        let now = chrono::Utc::now();
        Class {
            id: 10,
            name: "Matematika XI IPA 1".to_string(),
            subject_id: 1,
            teacher_id,
            homeroom_id: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_admin_and_owner_teacher() {
        let class = class(2);
        assert_eq!(
            resolve_access(&user(1, UserRole::Admin), &class, false, false),
            Some(ClassAccess::Admin)
        );
        assert_eq!(
            resolve_access(&user(2, UserRole::WaliKelas), &class, false, false),
            Some(ClassAccess::Teacher)
        );
        assert_eq!(
            resolve_access(&user(3, UserRole::Guru), &class, false, true),
            None
        );
    }

    #[test]
    fn test_students_only_when_allowed_and_enrolled() {
        let class = class(2);
        let student = user(5, UserRole::Siswa);
        assert_eq!(
            resolve_access(&student, &class, true, true),
            Some(ClassAccess::Student)
        );
        assert_eq!(resolve_access(&student, &class, true, false), None);
        assert_eq!(resolve_access(&student, &class, false, true), None);
        assert!(!ClassAccess::Student.can_manage());
    }
}
