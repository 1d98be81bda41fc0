//! 动态配置缓存
//!
//! 启动时从数据库加载系统设置，管理员修改后热更新。

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;

static DYNAMIC_CONFIG: OnceLock<RwLock<DynamicConfigCache>> = OnceLock::new();

#[derive(Debug, Default)]
struct DynamicConfigCache {
    settings: HashMap<String, String>,
    initialized: bool,
}

/// 动态配置访问接口
pub struct DynamicConfig;

impl DynamicConfig {
    fn cache() -> &'static RwLock<DynamicConfigCache> {
        DYNAMIC_CONFIG.get_or_init(|| RwLock::new(DynamicConfigCache::default()))
    }

    /// 初始化缓存，在应用启动时调用
    pub async fn init(settings: Vec<(String, String)>) {
        let mut guard = Self::cache().write().await;
        guard.settings = settings.into_iter().collect();
        guard.initialized = true;

        tracing::info!(
            "动态配置缓存初始化完成，加载了 {} 个配置项",
            guard.settings.len()
        );
    }

    /// 更新单个配置项
    pub async fn update(key: &str, value: &str) {
        let mut guard = Self::cache().write().await;
        guard.settings.insert(key.to_string(), value.to_string());
        tracing::debug!("动态配置更新: {} = {}", key, value);
    }

    async fn get(key: KnownSettingKey) -> Option<String> {
        let guard = Self::cache().read().await;
        guard.settings.get(key.as_str()).cloned()
    }

    pub async fn system_name() -> String {
        Self::get(KnownSettingKey::SystemName)
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    pub async fn school_name() -> String {
        Self::get(KnownSettingKey::SchoolName)
            .await
            .unwrap_or_default()
    }

    pub async fn academic_year() -> String {
        Self::get(KnownSettingKey::AcademicYear)
            .await
            .unwrap_or_default()
    }

    pub async fn semester() -> String {
        Self::get(KnownSettingKey::Semester)
            .await
            .unwrap_or_else(|| "1".to_string())
    }

    pub async fn is_initialized() -> bool {
        Self::cache().read().await.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_is_visible() {
        DynamicConfig::init(vec![(
            "school.academic_year".to_string(),
            "2025/2026".to_string(),
        )])
        .await;
        assert!(DynamicConfig::is_initialized().await);
        assert_eq!(DynamicConfig::academic_year().await, "2025/2026");

        DynamicConfig::update("school.semester", "2").await;
        assert_eq!(DynamicConfig::semester().await, "2");
    }
}
