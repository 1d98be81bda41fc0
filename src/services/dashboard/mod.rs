pub mod student;
pub mod teacher;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use std::sync::Arc;

use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

/// 服务器本地时间的今天：(星期 1..=7, YYYY-MM-DD)
pub(crate) fn local_today() -> (i32, String) {
    let today = chrono::Local::now().date_naive();
    (
        today.weekday().number_from_monday() as i32,
        today.format("%Y-%m-%d").to_string(),
    )
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn student_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::student_dashboard(self, request).await
    }

    pub async fn teacher_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        teacher::teacher_dashboard(self, request).await
    }
}
