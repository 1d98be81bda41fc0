use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TopicService, class_from_request, load_topic, validate_title};
use crate::models::{
    ApiResponse, ErrorCode,
    topics::{
        requests::CreateMaterialRequest,
        responses::{MaterialListResponse, MaterialResponse},
    },
};
use crate::services::{current_user, storage_error_response};
use crate::utils::validate::validate_url;

/// 材料需要标题，并且至少有正文或链接之一
pub(crate) fn validate_material(material: &CreateMaterialRequest) -> Result<(), &'static str> {
    validate_title(&material.title)?;
    if let Some(link) = &material.link_url {
        validate_url(link)?;
    }
    let has_content = material
        .content
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if !has_content && material.link_url.is_none() {
        return Err("Material needs content or link_url");
    }
    Ok(())
}

pub async fn list_materials(
    service: &TopicService,
    topic_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    match storage.list_materials(topic_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MaterialListResponse { items },
            "Materials retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("获取材料失败", e)),
    }
}

pub async fn create_material(
    service: &TopicService,
    topic_id: i64,
    mut data: CreateMaterialRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    data.title = data.title.trim().to_string();
    data.link_url = data
        .link_url
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());
    if let Err(msg) = validate_material(&data) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::MaterialInvalid, msg)));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    match storage.create_material(topic_id, user.id, data).await {
        Ok(material) => Ok(HttpResponse::Created().json(ApiResponse::success(
            MaterialResponse { material },
            "材料创建成功",
        ))),
        Err(e) => Ok(storage_error_response("创建材料失败", e)),
    }
}

pub async fn delete_material(
    service: &TopicService,
    topic_id: i64,
    material_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let class = match class_from_request(request) {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_topic(&storage, class.id, topic_id).await {
        return Ok(resp);
    }

    match storage.get_material_by_id(material_id).await {
        Ok(Some(material)) if material.topic_id == topic_id => {}
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::MaterialNotFound,
                "Material not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("获取材料失败", e)),
    }

    match storage.delete_material(material_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("材料删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MaterialNotFound,
            "Material not found",
        ))),
        Err(e) => Ok(storage_error_response("删除材料失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(content: Option<&str>, link: Option<&str>) -> CreateMaterialRequest {
        CreateMaterialRequest {
            title: "Persamaan Linear".to_string(),
            content: content.map(str::to_string),
            link_url: link.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_material() {
        assert!(validate_material(&material(Some("Ringkasan"), None)).is_ok());
        assert!(validate_material(&material(None, Some("https://youtu.be/abc"))).is_ok());
        assert!(validate_material(&material(None, Some("ftp://files/abc"))).is_err());
        assert!(validate_material(&material(Some("  "), None)).is_err());
    }
}
