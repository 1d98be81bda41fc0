pub mod conflict;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::schedules::requests::{
    CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest,
};
use crate::storage::Storage;

pub struct ScheduleService {
    storage: Option<Arc<dyn Storage>>,
}

impl ScheduleService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_schedules(
        &self,
        query: ScheduleListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_schedules(self, query, request).await
    }

    pub async fn my_schedule(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::my_schedule(self, request).await
    }

    pub async fn create_schedule(
        &self,
        data: CreateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_schedule(self, data, request).await
    }

    pub async fn update_schedule(
        &self,
        id: i64,
        data: UpdateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_schedule(self, id, data, request).await
    }

    pub async fn delete_schedule(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_schedule(self, id, request).await
    }
}
