use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::storage_error_response;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_full_name, validate_password_simple, validate_username,
};

/// 校验新用户字段，返回错误码与提示
pub(crate) fn validate_new_user(user: &CreateUserRequest) -> Result<(), (ErrorCode, String)> {
    validate_username(&user.username)
        .map_err(|msg| (ErrorCode::UserNameInvalid, msg.to_string()))?;
    if let Some(email) = &user.email {
        validate_email(email).map_err(|msg| (ErrorCode::UserEmailInvalid, msg.to_string()))?;
    }
    validate_full_name(&user.full_name)
        .map_err(|msg| (ErrorCode::UserFullNameInvalid, msg.to_string()))?;
    validate_password_simple(&user.password).map_err(|msg| (ErrorCode::UserPasswordInvalid, msg))?;
    if user.homeroom_id.is_some() && user.role != UserRole::Siswa {
        return Err((
            ErrorCode::BadRequest,
            "Only students can be assigned to a homeroom".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    if let Err((code, msg)) = validate_new_user(&user_data) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    let storage = service.get_storage(request)?;

    if let Some(homeroom_id) = user_data.homeroom_id {
        match storage.get_homeroom_by_id(homeroom_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::HomeroomNotFound,
                    "Homeroom not found",
                )));
            }
            Err(e) => return Ok(storage_error_response("获取行政班失败", e)),
        }
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Password hashing failed",
                )),
            );
        }
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            tracing::info!("User {} created with role {}", user.username, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "用户创建成功")))
        }
        Err(LmsError::Conflict(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Username or email already exists",
        ))),
        Err(e) => Ok(storage_error_response("创建用户失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: Some("siti@sekolah.sch.id".to_string()),
            password: "Rahasia123".to_string(),
            full_name: "Siti Aminah".to_string(),
            role,
            nis_nip: None,
            homeroom_id: None,
        }
    }

    #[test]
    fn test_validate_new_user() {
        assert!(validate_new_user(&request("siti", UserRole::Siswa)).is_ok());

        let err = validate_new_user(&request("s", UserRole::Siswa)).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserNameInvalid);

        let mut weak = request("siti", UserRole::Siswa);
        weak.password = "123".to_string();
        assert_eq!(
            validate_new_user(&weak).unwrap_err().0,
            ErrorCode::UserPasswordInvalid
        );

        let mut teacher = request("pak_budi", UserRole::Guru);
        teacher.homeroom_id = Some(1);
        assert_eq!(
            validate_new_user(&teacher).unwrap_err().0,
            ErrorCode::BadRequest
        );
    }
}
