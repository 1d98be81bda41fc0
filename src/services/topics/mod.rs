pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod materials;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireClassAccess;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::entities::Class,
    topics::{
        entities::Topic,
        requests::{CreateMaterialRequest, CreateTopicRequest, UpdateTopicRequest},
    },
};
use crate::services::storage_error_response;
use crate::storage::Storage;

pub struct TopicService {
    storage: Option<Arc<dyn Storage>>,
}

pub(crate) fn validate_title(title: &str) -> Result<(), &'static str> {
    let len = title.trim().chars().count();
    if len == 0 || len > 200 {
        return Err("Title must be 1 to 200 characters");
    }
    Ok(())
}

/// 当前请求中的班级（由 RequireClassAccess 写入）
pub(crate) fn class_from_request(request: &HttpRequest) -> Result<Class, HttpResponse> {
    RequireClassAccess::extract_class(request).ok_or_else(|| {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        ))
    })
}

/// 读取属于该班级的主题
pub(crate) async fn load_topic(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    topic_id: i64,
) -> Result<Topic, HttpResponse> {
    match storage.get_topic_by_id(topic_id).await {
        Ok(Some(topic)) if topic.class_id == class_id => Ok(topic),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TopicNotFound,
            "Topic not found",
        ))),
        Err(e) => Err(storage_error_response("获取主题失败", e)),
    }
}

impl TopicService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_topics(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_topics(self, request).await
    }

    pub async fn create_topic(
        &self,
        data: CreateTopicRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_topic(self, data, request).await
    }

    pub async fn get_topic_detail(
        &self,
        topic_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_topic_detail(self, topic_id, request).await
    }

    pub async fn update_topic(
        &self,
        topic_id: i64,
        data: UpdateTopicRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_topic(self, topic_id, data, request).await
    }

    pub async fn delete_topic(
        &self,
        topic_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_topic(self, topic_id, request).await
    }

    // 学习材料
    pub async fn list_materials(
        &self,
        topic_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        materials::list_materials(self, topic_id, request).await
    }

    pub async fn create_material(
        &self,
        topic_id: i64,
        data: CreateMaterialRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        materials::create_material(self, topic_id, data, request).await
    }

    pub async fn delete_material(
        &self,
        topic_id: i64,
        material_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        materials::delete_material(self, topic_id, material_id, request).await
    }
}
