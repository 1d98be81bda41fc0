/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>` 中的 access token，
 * 通过对象缓存或存储加载用户，并将 [`User`] 放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/classes")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_classes))
 * ```
 *
 * 处理函数中使用 [`RequireJWT::extract_user_claims`] 读取当前用户。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserStatus};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败的原因
enum AuthFailure {
    Unauthorized(String),
    Inactive,
}

/// 用户缓存键
pub(crate) fn user_cache_key(token: &str) -> String {
    format!("user:{token}")
}

// 提取并验证 access token，返回当前用户
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            AuthFailure::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::Unauthorized("Invalid JWT token".to_string())
    })?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    if let Some(cache) = &cache {
        match cache.get_raw(&user_cache_key(token)).await {
            CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) => return Ok(user),
                Err(_) => {
                    cache.remove(&user_cache_key(token)).await;
                    info!("Failed to deserialize cached user, falling back to storage");
                }
            },
            _ => debug!("User not found in cache"),
        }
    }

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::Unauthorized("Storage not available".to_string()))?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AuthFailure::Unauthorized("Invalid user ID in JWT".to_string()))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|_| AuthFailure::Unauthorized("Failed to retrieve user".to_string()))?
        .ok_or_else(|| AuthFailure::Unauthorized("User not found".to_string()))?;

    if user.status != UserStatus::Active {
        return Err(AuthFailure::Inactive);
    }

    if let Some(cache) = &cache
        && let Ok(user_json) = serde_json::to_string(&user)
    {
        cache
            .insert_raw(
                user_cache_key(token),
                user_json,
                AppConfig::get().cache.default_ttl,
            )
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求直接返回
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(AuthFailure::Inactive) => {
                    info!("Inactive user rejected for request to {}", req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::AccountDisabled,
                            "Account is not active",
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(AuthFailure::Unauthorized(err)) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 从请求扩展中读取当前用户，需在 RequireJWT 之后使用
impl RequireJWT {
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }
}
