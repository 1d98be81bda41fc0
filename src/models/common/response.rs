use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

/// 所有接口共用的响应外壳，`code` 为 0 表示成功
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    fn build(code: ErrorCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, message, Some(data))
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success as i32
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::build(ErrorCode::Success, message, None)
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(code, message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_omits_data() {
        let resp = ApiResponse::error_empty(ErrorCode::ClassHasMembers, "kelas masih punya siswa");
        assert!(!resp.is_success());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 5002);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_carries_data() {
        let resp = ApiResponse::success(vec![1, 2, 3], "ok");
        assert!(resp.is_success());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }
}
