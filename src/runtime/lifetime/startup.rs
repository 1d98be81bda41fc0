use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::system::DynamicConfig;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

const MEMORY_CACHE: &str = "moka";

/// 按配置创建缓存，找不到或失败时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    debug!("Creating {} cache backend", cache_type);

    match get_object_cache_plugin(cache_type) {
        Some(constructor) => match constructor().await {
            Ok(cache) => return Ok(Arc::from(cache)),
            Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
        },
        None => warn!("Cache backend '{}' not found in registry", cache_type),
    }

    if cache_type == MEMORY_CACHE {
        return Err(LmsError::cache_connection("memory cache unavailable"));
    }

    warn!("Falling back to in-memory cache");
    let constructor = get_object_cache_plugin(MEMORY_CACHE)
        .ok_or_else(|| LmsError::cache_connection("memory cache plugin not registered"))?;
    Ok(Arc::from(constructor().await?))
}

/// 生成随机密码
fn generate_random_password(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 从数据库加载系统设置到全局缓存
async fn init_dynamic_config(storage: &Arc<dyn Storage>) {
    let settings = match storage.list_settings().await {
        Ok(settings) => settings.into_iter().map(|s| (s.key, s.value)).collect(),
        Err(e) => {
            warn!("Failed to load system settings: {}, using defaults", e);
            Vec::new()
        }
    };
    DynamicConfig::init(settings).await;
}

/// 数据库为空时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(0) => info!("No users found, creating default admin account"),
        Ok(count) => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD not set, generated admin password: {}", pwd);
        warn!("  Save it now or set ADMIN_PASSWORD before next start");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: "admin".to_string(),
        email: None,
        password: password_hash,
        full_name: "Administrator".to_string(),
        role: UserRole::Admin,
        nis_nip: None,
        homeroom_id: None,
    };

    match storage.create_user(admin).await {
        Ok(user) => info!("Default admin created (id: {}, username: {})", user.id, user.username),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 启动前准备存储、系统设置、默认管理员和缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    init_dynamic_config(&storage).await;
    seed_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_charset() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.len(), 16);
        assert!(pwd.bytes().all(|b| b.is_ascii_graphic()));
    }
}
