/*!
 * 速率限制中间件
 *
 * 以用户 ID（已认证）或客户端 IP 为键，在固定窗口内计数，
 * 超过限制返回 429。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .route(web::post().to(login))
 *     .wrap(RateLimit::login())
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::{Expiry, future::Cache};
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 窗口内的计数，窗口从第一次请求开始
#[derive(Clone, Copy)]
struct Window {
    count: u32,
    length: Duration,
}

struct WindowExpiry;

impl Expiry<String, Window> for WindowExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Window,
        _now: Instant,
    ) -> Option<Duration> {
        Some(value.length)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        _value: &Window,
        _now: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        duration_until_expiry
    }
}

/// 全局计数缓存，键: 前缀:标识
static RATE_LIMIT_CACHE: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .expire_after(WindowExpiry)
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 刷新令牌：10 次/分钟
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 批量导入：5 次/分钟
    pub fn import() -> Self {
        Self::new(5, 60).with_prefix("import")
    }
}

// 优先使用连接信息中的地址，其次是转发头
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

/// 计数加一，返回本次请求之前的计数；已达上限时不再累加
///
/// 更新已有键时保留原有过期时间，窗口从第一次请求开始计算。
async fn hit(cache_key: &str, max_requests: u32, window: Duration) -> u32 {
    let current = RATE_LIMIT_CACHE.get(cache_key).await;
    let before = current.map(|w| w.count).unwrap_or(0);
    if before >= max_requests {
        return before;
    }

    let next = match current {
        Some(w) => Window {
            count: w.count + 1,
            ..w
        },
        None => Window {
            count: 1,
            length: window,
        },
    };
    RATE_LIMIT_CACHE.insert(cache_key.to_string(), next).await;
    before
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    rule: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let rule = self.rule.clone();

        Box::pin(async move {
            let identifier = req
                .extensions()
                .get::<User>()
                .map(|user| format!("user:{}", user.id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if rule.key_prefix.is_empty() {
                identifier
            } else {
                format!("{}:{}", rule.key_prefix, identifier)
            };

            let before = hit(
                &cache_key,
                rule.max_requests,
                Duration::from_secs(rule.window_secs),
            )
            .await;

            if before >= rule.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (limit: {})",
                    cache_key, rule.max_requests
                );
                return Ok(req.into_response(
                    create_rate_limit_response(rule.window_secs).map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_stops_at_limit() {
        let key = "test:hit_stops_at_limit";
        let window = Duration::from_secs(60);
        assert_eq!(hit(key, 2, window).await, 0);
        assert_eq!(hit(key, 2, window).await, 1);
        assert_eq!(hit(key, 2, window).await, 2);
        assert_eq!(hit(key, 2, window).await, 2);
    }

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let refresh = RateLimit::refresh_token();
        assert_eq!(refresh.max_requests, 10);
    }
}
