use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

/// 可选整数查询参数，兼容字符串形式（query string 经过 flatten 后全部为字符串）
pub fn deserialize_option_string_to_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrInt {
        Int(i64),
        Str(String),
    }

    match Option::<StringOrInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrInt::Int(v)) => Ok(Some(v)),
        Some(StringOrInt::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrInt::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::custom(format!("invalid integer: {s}"))),
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

impl PaginationQuery {
    /// 规范化分页参数，返回 (page, size)：page 从 1 开始，size 限制在 1..=100
    pub fn normalized(&self) -> (u64, u64) {
        (self.page.max(1) as u64, self.size.clamp(1, 100) as u64)
    }
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_accepts_strings_and_numbers() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":25}"#).unwrap();
        assert_eq!(q.page, 3);
        assert_eq!(q.size, 25);
    }

    #[test]
    fn test_pagination_defaults() {
        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.size, 10);
    }

    #[test]
    fn test_pagination_rejects_garbage() {
        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page":"abc"}"#).is_err());
    }

    #[test]
    fn test_optional_integer_from_string() {
        #[derive(Deserialize)]
        struct Q {
            #[serde(default, deserialize_with = "deserialize_option_string_to_i64")]
            id: Option<i64>,
        }
        let q: Q = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
        assert_eq!(q.id, Some(42));
        let q: Q = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert_eq!(q.id, Some(7));
        let q: Q = serde_json::from_str("{}").unwrap();
        assert_eq!(q.id, None);
    }

    #[test]
    fn test_normalized_clamps() {
        let q = PaginationQuery { page: 0, size: 1000 };
        assert_eq!(q.normalized(), (1, 100));
        let q = PaginationQuery { page: 2, size: 0 };
        assert_eq!(q.normalized(), (2, 1));
    }

    #[test]
    fn test_pagination_info_total_pages() {
        let info = PaginationInfo::new(1, 10, 21);
        assert_eq!(info.total_pages, 3);
        let info = PaginationInfo::new(1, 10, 0);
        assert_eq!(info.total_pages, 0);
    }
}
