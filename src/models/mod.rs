//! 数据模型定义
//!
//! 按业务域划分，每个子模块包含 `entities`（业务实体）、`requests`（请求体与查询参数）
//! 和 `responses`（响应体）。所有模型同时导出 TypeScript 类型供前端使用。

/// 定义以小写字符串存储和传输的枚举
///
/// 自动生成：
/// - serde 序列化/反序列化（使用给定的字符串值）
/// - TS 类型导出
/// - as_str() / Display / FromStr
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($ts_path:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, ts_rs::TS,
        )]
        #[ts(export, export_to = $ts_path)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }
    };
}

pub mod announcements;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod homerooms;
pub mod reports;
pub mod schedules;
pub mod subjects;
pub mod system;
pub mod topics;
pub mod users;

pub use common::{
    ApiResponse, AppStartTime, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery,
};
