use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::info;

use super::{DynamicConfig, SystemService};
use crate::models::{
    ApiResponse, ErrorCode,
    system::{
        entities::KnownSettingKey,
        requests::{UpdateSettingItem, UpdateSettingsRequest},
        responses::{SettingsUpdateResponse, SystemSettingsResponse},
    },
};
use crate::services::{current_user, storage_error_response};

/// 校验批量更新：键必须已知、不重复，值需通过各自的规则
pub(crate) fn validate_items(items: &[UpdateSettingItem]) -> Result<Vec<(String, String)>, String> {
    if items.is_empty() {
        return Err("No settings to update".to_string());
    }
    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(items.len());
    for item in items {
        let key: KnownSettingKey = item.key.parse()?;
        if !seen.insert(key.as_str()) {
            return Err(format!("Duplicate setting key: {}", item.key));
        }
        let value = item.value.trim();
        key.validate(value)?;
        validated.push((key.as_str().to_string(), value.to_string()));
    }
    Ok(validated)
}

/// 系统设置（所有登录用户可读）
pub async fn get_settings(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    let settings = match storage.list_settings().await {
        Ok(settings) => settings,
        Err(e) => return Ok(storage_error_response("获取系统设置失败", e)),
    };

    let response = SystemSettingsResponse {
        system_name: DynamicConfig::system_name().await,
        school_name: DynamicConfig::school_name().await,
        academic_year: DynamicConfig::academic_year().await,
        semester: DynamicConfig::semester().await,
        environment: config.app.environment.clone(),
        settings,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Settings retrieved successfully",
    )))
}

/// 批量更新系统设置（管理员）
pub async fn update_settings(
    service: &SystemService,
    data: UpdateSettingsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let items = match validate_items(&data.settings) {
        Ok(items) => items,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::SettingInvalid, msg)));
        }
    };

    let storage = service.get_storage(request)?;
    let settings = match storage.update_settings(items.clone(), user.id).await {
        Ok(settings) => settings,
        Err(e) => return Ok(storage_error_response("更新系统设置失败", e)),
    };

    // 写库成功后再刷新缓存
    for (key, value) in &items {
        DynamicConfig::update(key, value).await;
    }
    info!("用户 {} 更新了 {} 个系统设置", user.id, items.len());

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SettingsUpdateResponse { settings },
        "Settings updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, value: &str) -> UpdateSettingItem {
        UpdateSettingItem {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_validate_items() {
        let ok = validate_items(&[
            item("school.academic_year", "2026/2027"),
            item("school.semester", " 2 "),
        ])
        .unwrap();
        assert_eq!(ok[1], ("school.semester".to_string(), "2".to_string()));

        assert!(validate_items(&[]).is_err());
        assert!(validate_items(&[item("upload.max_size", "10")]).is_err());
        assert!(validate_items(&[item("school.semester", "3")]).is_err());
        assert!(
            validate_items(&[item("school.semester", "1"), item("school.semester", "2")]).is_err()
        );
    }
}
