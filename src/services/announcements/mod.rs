pub mod create;
pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::announcements::requests::{
    AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::storage::Storage;

pub struct AnnouncementService {
    storage: Option<Arc<dyn Storage>>,
}

pub(crate) fn validate_announcement_text(title: &str, content: &str) -> Result<(), &'static str> {
    crate::services::topics::validate_title(title)?;
    if content.trim().is_empty() {
        return Err("Content cannot be empty");
    }
    Ok(())
}

impl AnnouncementService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_announcements(
        &self,
        query: AnnouncementListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_announcements(self, query, request).await
    }

    pub async fn create_announcement(
        &self,
        data: CreateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_announcement(self, data, request).await
    }

    pub async fn update_announcement(
        &self,
        id: i64,
        data: UpdateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_announcement(self, id, data, request).await
    }

    pub async fn delete_announcement(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_announcement(self, id, request).await
    }
}
