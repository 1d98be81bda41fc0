pub mod settings;
pub mod settings_cache;

pub use settings_cache::DynamicConfig;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::system::requests::UpdateSettingsRequest;
use crate::storage::Storage;

pub struct SystemService {
    storage: Option<Arc<dyn Storage>>,
}

impl SystemService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn get_settings(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        settings::get_settings(self, request).await
    }

    pub async fn update_settings(
        &self,
        data: UpdateSettingsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        settings::update_settings(self, data, request).await
    }
}
