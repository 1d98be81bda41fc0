use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 环境变量 -> 配置键，优先级高于配置文件和 `LMS_*` 变量
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
];

/// 没有 config.toml 时使用的默认值
fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("app.system_name", "Sekolah LMS")?
        .set_default("app.environment", "development")?
        .set_default("app.log_level", "info")?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.unix_socket_path", "")?
        .set_default("server.workers", 0)?
        .set_default("server.max_workers", 8)?
        .set_default("server.timeouts.client_request", 5000)?
        .set_default("server.timeouts.client_disconnect", 1000)?
        .set_default("server.timeouts.keep_alive", 75)?
        .set_default("server.limits.max_payload_size", 2 * 1024 * 1024)?
        .set_default("jwt.secret", "")?
        .set_default("jwt.access_token_expiry", 30)?
        .set_default("jwt.refresh_token_expiry", 7)?
        .set_default("jwt.refresh_token_remember_me_expiry", 30)?
        .set_default("database.url", "sekolah-lms.db")?
        .set_default("database.pool_size", 8)?
        .set_default("database.timeout", 10)?
        .set_default("cache.default_ttl", 300)?
        .set_default("cache.memory.max_capacity", 10_000)?
        .set_default("cors.allowed_origins", vec!["*"])?
        .set_default("cors.allowed_methods", vec!["GET", "POST", "PUT", "DELETE"])?
        .set_default("cors.allowed_headers", vec!["Authorization", "Content-Type"])?
        .set_default("cors.max_age", 3600)?
        .set_default("argon2.memory_cost", 19456)?
        .set_default("argon2.time_cost", 2)?
        .set_default("argon2.parallelism", 1)?
        .set_default("import.max_rows", 1000)
}

impl AppConfig {
    /// 加载配置：默认值 < config.toml < config.<APP_ENV>.toml < LMS_* < 显式环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = with_defaults(Config::builder())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("LMS")
                    .separator("_")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// 启动前拒绝明显无效的配置
    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must not be empty (set JWT_SECRET)".to_string(),
            ));
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "jwt token expiry must be positive".to_string(),
            ));
        }
        if self.import.max_rows == 0 {
            return Err(ConfigError::Message(
                "import.max_rows must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 获取全局配置，未初始化时按默认流程加载
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用一次
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 配置了 Unix 套接字时返回其路径
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults_only() -> AppConfig {
        with_defaults(Config::builder())
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_deserialize() {
        let config = defaults_only();
        assert_eq!(config.app.system_name, "Sekolah LMS");
        assert_eq!(config.cache.cache_type, "moka");
        assert_eq!(config.server.limits.max_payload_size, 2 * 1024 * 1024);
        assert_eq!(config.import.max_rows, 1000);
    }

    #[test]
    fn test_validate_requires_secret() {
        let mut config = defaults_only();
        assert!(config.validate().is_err());
        config.jwt.secret = "secret".to_string();
        assert!(config.validate().is_ok());
        config.import.max_rows = 0;
        assert!(config.validate().is_err());
    }
}
