use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 配置值类型
    SettingValueType("../frontend/src/types/generated/system.ts") {
        String => "string",
        Integer => "integer",
        Boolean => "boolean",
    }
}

/// 已知配置键
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnownSettingKey {
    SystemName,
    SchoolName,
    AcademicYear,
    Semester,
}

impl KnownSettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SystemName => "app.system_name",
            KnownSettingKey::SchoolName => "school.name",
            KnownSettingKey::AcademicYear => "school.academic_year",
            KnownSettingKey::Semester => "school.semester",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::SystemName => SettingValueType::String,
            KnownSettingKey::SchoolName => SettingValueType::String,
            KnownSettingKey::AcademicYear => SettingValueType::String,
            KnownSettingKey::Semester => SettingValueType::Integer,
        }
    }

    /// 校验配置值
    pub fn validate(&self, value: &str) -> Result<(), String> {
        match self {
            KnownSettingKey::SystemName | KnownSettingKey::SchoolName => {
                if value.trim().is_empty() {
                    return Err(format!("{} 不能为空", self.as_str()));
                }
            }
            KnownSettingKey::AcademicYear => {
                // 形如 2025/2026，且后一年 = 前一年 + 1
                let valid = value
                    .split_once('/')
                    .and_then(|(a, b)| Some((a.parse::<i32>().ok()?, b.parse::<i32>().ok()?)))
                    .is_some_and(|(a, b)| b == a + 1);
                if !valid {
                    return Err("学年格式应为 YYYY/YYYY，例如 2025/2026".to_string());
                }
            }
            KnownSettingKey::Semester => {
                if value != "1" && value != "2" {
                    return Err("学期只能为 1 或 2".to_string());
                }
            }
        }
        Ok(())
    }

    pub fn all() -> Vec<Self> {
        vec![
            KnownSettingKey::SystemName,
            KnownSettingKey::SchoolName,
            KnownSettingKey::AcademicYear,
            KnownSettingKey::Semester,
        ]
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "app.system_name" => Ok(KnownSettingKey::SystemName),
            "school.name" => Ok(KnownSettingKey::SchoolName),
            "school.academic_year" => Ok(KnownSettingKey::AcademicYear),
            "school.semester" => Ok(KnownSettingKey::Semester),
            _ => Err(format!("Unknown setting key: {s}")),
        }
    }
}

/// 系统设置实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_roundtrip() {
        for key in KnownSettingKey::all() {
            assert_eq!(key.as_str().parse::<KnownSettingKey>(), Ok(key));
        }
        assert!("upload.max_size".parse::<KnownSettingKey>().is_err());
    }

    #[test]
    fn test_setting_validation() {
        assert!(KnownSettingKey::AcademicYear.validate("2025/2026").is_ok());
        assert!(KnownSettingKey::AcademicYear.validate("2025/2027").is_err());
        assert!(KnownSettingKey::AcademicYear.validate("2025").is_err());
        assert!(KnownSettingKey::Semester.validate("2").is_ok());
        assert!(KnownSettingKey::Semester.validate("3").is_err());
        assert!(KnownSettingKey::SystemName.validate("  ").is_err());
    }
}
