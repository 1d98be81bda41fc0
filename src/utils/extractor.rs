//! 路径参数提取器
//!
//! 将路径中的 ID 解析为正整数，失败时直接返回统一格式的 400 响应。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 解析正整数 ID
pub(crate) fn parse_positive_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok()).filter(|id| *id > 0)
}

macro_rules! define_safe_id_extractor {
    ($($name:ident => $param:literal),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    match parse_positive_id(req.match_info().get($param)) {
                        Some(id) => ready(Ok($name(id))),
                        None => {
                            let message = concat!("Invalid path parameter: ", $param);
                            let response = HttpResponse::BadRequest()
                                .json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
                            ready(Err(InternalError::from_response(message, response).into()))
                        }
                    }
                }
            }
        )+
    };
}

define_safe_id_extractor! {
    SafeIDI64 => "id",
    SafeClassIdI64 => "class_id",
    SafeTopicIdI64 => "topic_id",
    SafeMaterialIdI64 => "material_id",
    SafeStudentIdI64 => "student_id",
    SafeNoteIdI64 => "note_id",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("42")), Some(42));
        assert_eq!(parse_positive_id(Some("0")), None);
        assert_eq!(parse_positive_id(Some("-3")), None);
        assert_eq!(parse_positive_id(Some("abc")), None);
        assert_eq!(parse_positive_id(None), None);
    }
}
