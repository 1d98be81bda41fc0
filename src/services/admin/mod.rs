pub mod classes;
pub mod report;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::reports::requests::AttendanceReportQuery;
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request).await
    }

    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        classes::list_all_classes(self, request).await
    }

    pub async fn attendance_report(
        &self,
        query: AttendanceReportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        report::attendance_report(self, query, request).await
    }
}
