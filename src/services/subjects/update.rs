use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, validate_subject_code, validate_subject_name};
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode,
    subjects::{requests::UpdateSubjectRequest, responses::SubjectResponse},
};
use crate::services::storage_error_response;

pub async fn update_subject(
    service: &SubjectService,
    id: i64,
    mut data: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    data.code = data.code.map(|c| c.trim().to_uppercase());
    data.name = data.name.map(|n| n.trim().to_string());

    let validation = data
        .code
        .as_deref()
        .map_or(Ok(()), validate_subject_code)
        .and(data.name.as_deref().map_or(Ok(()), validate_subject_name));
    if let Err(msg) = validation {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request)?;
    match storage.update_subject(id, data).await {
        Ok(Some(subject)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubjectResponse { subject },
            "科目更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubjectNotFound,
            "Subject not found",
        ))),
        Err(LmsError::Conflict(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SubjectAlreadyExists,
            "Subject code already exists",
        ))),
        Err(e) => Ok(storage_error_response("更新科目失败", e)),
    }
}
