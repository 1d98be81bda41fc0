use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, validate_subject_code, validate_subject_name};
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode,
    subjects::{requests::CreateSubjectRequest, responses::SubjectResponse},
};
use crate::services::storage_error_response;

pub async fn create_subject(
    service: &SubjectService,
    mut data: CreateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    data.code = data.code.trim().to_uppercase();
    data.name = data.name.trim().to_string();

    if let Err(msg) = validate_subject_code(&data.code).and(validate_subject_name(&data.name)) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request)?;
    match storage.create_subject(data).await {
        Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(
            SubjectResponse { subject },
            "科目创建成功",
        ))),
        Err(LmsError::Conflict(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SubjectAlreadyExists,
            "Subject code already exists",
        ))),
        Err(e) => Ok(storage_error_response("创建科目失败", e)),
    }
}
