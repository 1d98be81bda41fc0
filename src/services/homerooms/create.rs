use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{HomeroomService, check_homeroom_teacher};
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode,
    homerooms::{requests::CreateHomeroomRequest, responses::HomeroomResponse},
    system::entities::KnownSettingKey,
};
use crate::services::storage_error_response;

/// 校验行政班字段，未提供的字段跳过
pub(crate) fn validate_homeroom_fields(
    name: Option<&str>,
    grade_level: Option<i32>,
    academic_year: Option<&str>,
) -> Result<(), String> {
    if let Some(name) = name
        && (name.trim().is_empty() || name.chars().count() > 50)
    {
        return Err("Homeroom name must be 1 to 50 characters".to_string());
    }
    if let Some(level) = grade_level
        && !(1..=12).contains(&level)
    {
        return Err("Grade level must be between 1 and 12".to_string());
    }
    if let Some(year) = academic_year {
        KnownSettingKey::AcademicYear.validate(year)?;
    }
    Ok(())
}

pub async fn create_homeroom(
    service: &HomeroomService,
    mut data: CreateHomeroomRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    data.name = data.name.trim().to_string();
    if let Err(msg) = validate_homeroom_fields(
        Some(&data.name),
        Some(data.grade_level),
        Some(&data.academic_year),
    ) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request)?;

    if let Some(teacher_id) = data.homeroom_teacher_id
        && let Err(resp) = check_homeroom_teacher(&storage, teacher_id, None).await
    {
        return Ok(resp);
    }

    let homeroom = match storage.create_homeroom(data).await {
        Ok(homeroom) => homeroom,
        Err(LmsError::Conflict(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::HomeroomAlreadyExists,
                "Homeroom name already exists",
            )));
        }
        Err(e) => return Ok(storage_error_response("创建行政班失败", e)),
    };

    match storage.get_homeroom_detail(homeroom.id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            HomeroomResponse { homeroom: detail },
            "行政班创建成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::HomeroomNotFound,
            "Homeroom not found",
        ))),
        Err(e) => Ok(storage_error_response("获取行政班失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_homeroom_fields() {
        assert!(validate_homeroom_fields(Some("XI IPA 1"), Some(11), Some("2025/2026")).is_ok());
        assert!(validate_homeroom_fields(Some("  "), None, None).is_err());
        assert!(validate_homeroom_fields(None, Some(13), None).is_err());
        assert!(validate_homeroom_fields(None, None, Some("2025-2026")).is_err());
        assert!(validate_homeroom_fields(None, None, None).is_ok());
    }
}
