//! 对象缓存
//!
//! 缓存后端以插件形式注册（见 [`declare_object_cache_plugin!`]），
//! 启动时按 `cache.type` 选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用后端默认值
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明一个缓存插件，程序加载时自动注册
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
