pub mod grade;
pub mod list;
pub mod mine;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::requests::{GradeSubmissionRequest, SubmitAssignmentRequest};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 学生提交作业（测验自动评分）
    pub async fn submit(
        &self,
        assignment_id: i64,
        data: SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, assignment_id, data, request).await
    }

    /// 作业的全部提交
    pub async fn list_submissions(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, assignment_id, request).await
    }

    /// 学生自己的提交及答题记录
    pub async fn get_my_submission(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mine::get_my_submission(self, assignment_id, request).await
    }

    /// 批改提交
    pub async fn grade_submission(
        &self,
        submission_id: i64,
        data: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, submission_id, data, request).await
    }
}
