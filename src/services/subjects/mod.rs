pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListParams, UpdateSubjectRequest,
};
use crate::storage::Storage;

pub struct SubjectService {
    storage: Option<Arc<dyn Storage>>,
}

/// 科目代码：1-20 位字母、数字或连字符
pub(crate) fn validate_subject_code(code: &str) -> Result<(), &'static str> {
    if code.is_empty() || code.len() > 20 {
        return Err("Subject code must be 1 to 20 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("Subject code must contain only letters, numbers, '-' or '_'");
    }
    Ok(())
}

pub(crate) fn validate_subject_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 || len > 100 {
        return Err("Subject name must be 1 to 100 characters");
    }
    Ok(())
}

impl SubjectService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_subjects(
        &self,
        query: SubjectListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_subjects(self, query, request).await
    }

    pub async fn create_subject(
        &self,
        data: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_subject(self, data, request).await
    }

    pub async fn get_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_subject(self, id, request).await
    }

    pub async fn update_subject(
        &self,
        id: i64,
        data: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_subject(self, id, data, request).await
    }

    pub async fn delete_subject(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_subject(self, id, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_subject_code() {
        assert!(validate_subject_code("MTK-10").is_ok());
        assert!(validate_subject_code("").is_err());
        assert!(validate_subject_code("MTK 10").is_err());
        assert!(validate_subject_code(&"A".repeat(21)).is_err());
    }
}
