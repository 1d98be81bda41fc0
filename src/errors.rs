//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LmsError {
            $($variant(String),)*
        }

        impl LmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Import("E014", "Import Error"),
}

impl LmsError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为唯一约束冲突
    pub fn is_conflict(&self) -> bool {
        matches!(self, LmsError::Conflict(_))
    }

    /// 将数据库错误转换为业务错误，唯一约束冲突单独识别
    pub fn from_db(context: &str, err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                LmsError::Conflict(format!("{context}: {detail}"))
            }
            _ => LmsError::DatabaseOperation(format!("{context}: {err}")),
        }
    }
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LmsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        LmsError::from_db("数据库操作失败", err)
    }
}

impl From<std::io::Error> for LmsError {
    fn from(err: std::io::Error) -> Self {
        LmsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LmsError {
    fn from(err: serde_json::Error) -> Self {
        LmsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LmsError {
    fn from(err: chrono::ParseError) -> Self {
        LmsError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for LmsError {
    fn from(err: csv::Error) -> Self {
        LmsError::Import(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LmsError::cache_connection("test").code(), "E001");
        assert_eq!(LmsError::database_config("test").code(), "E003");
        assert_eq!(LmsError::validation("test").code(), "E007");
        assert_eq!(LmsError::conflict("test").code(), "E010");
        assert_eq!(LmsError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LmsError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(LmsError::validation("test").error_type(), "Validation Error");
        assert_eq!(LmsError::import("bad row").error_type(), "Import Error");
    }

    #[test]
    fn test_error_message() {
        let err = LmsError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = LmsError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_conflict_detection() {
        assert!(LmsError::conflict("username").is_conflict());
        assert!(!LmsError::not_found("user").is_conflict());
        let err = LmsError::from_db("查询失败", sea_orm::DbErr::Custom("boom".into()));
        assert_eq!(err.code(), "E005");
    }
}
