use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub role: String,       // 用户角色
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    /// access token 有效期（秒）
    pub fn access_token_expires_in() -> i64 {
        AppConfig::get().jwt.access_token_expiry * 60
    }

    /// refresh token 有效期，勾选“记住我”时更长
    pub fn refresh_token_expiry(remember_me: bool) -> chrono::Duration {
        let jwt = &AppConfig::get().jwt;
        if remember_me {
            chrono::Duration::days(jwt.refresh_token_remember_me_expiry)
        } else {
            chrono::Duration::days(jwt.refresh_token_expiry)
        }
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::generate_token(
            user_id,
            role,
            TokenType::Access,
            chrono::Duration::minutes(AppConfig::get().jwt.access_token_expiry),
        )
    }

    pub fn generate_token(
        user_id: i64,
        role: &str,
        token_type: TokenType,
        expiry: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.as_str().to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret().as_bytes()),
        )
    }

    // 生成 access + refresh token 对
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access_token = Self::generate_access_token(user_id, role)?;
        let refresh_token = Self::generate_token(
            user_id,
            role,
            TokenType::Refresh,
            refresh_token_expiry.unwrap_or_else(|| Self::refresh_token_expiry(false)),
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// 校验签名、过期时间和 token 类型
    pub fn verify_token(
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret().as_bytes()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != expected.as_str() {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token(token, TokenType::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token(token, TokenType::Refresh)
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age: chrono::Duration,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 清除 Refresh Token Cookie（注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_types_are_enforced() {
        let pair = JwtUtils::generate_token_pair(7, "guru", None).unwrap();

        let claims = JwtUtils::verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.role, "guru");

        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token =
            JwtUtils::generate_token(1, "admin", TokenType::Access, chrono::Duration::hours(-2))
                .unwrap();
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_logout_cookie_expires_refresh_token() {
        let cookie = JwtUtils::create_empty_refresh_token_cookie();
        assert_eq!(cookie.name(), REFRESH_TOKEN_COOKIE);
        assert!(cookie.value().is_empty());
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_remember_me_extends_refresh_expiry() {
        assert!(JwtUtils::refresh_token_expiry(true) >= JwtUtils::refresh_token_expiry(false));
    }
}
