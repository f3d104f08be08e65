// attendance-backend/src/utils/jwt.rs

use crate::domain::user_model::UserClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

/// JWT関連のエラー
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("JWT token has expired")]
    TokenExpired,

    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Missing JWT secret key")]
    MissingSecretKey,

    #[error("Invalid JWT configuration: {0}")]
    ConfigurationError(String),
}

/// アクセストークンのClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Not before
    pub nbf: i64,
    /// Issuer
    pub iss: String,
    /// JWT ID
    pub jti: String,
    /// Token type
    pub typ: String,
    /// User information
    pub user: UserClaims,
}

/// リフレッシュトークンのClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Not before
    pub nbf: i64,
    /// Issuer
    pub iss: String,
    /// JWT ID
    pub jti: String,
    /// Token type
    pub typ: String,
}

/// JWT設定
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT秘密鍵
    pub secret_key: String,
    /// アクセストークンの有効期限（分）
    pub access_token_expiry_minutes: i64,
    /// リフレッシュトークンの有効期限（日）
    pub refresh_token_expiry_days: i64,
    /// 発行者
    pub issuer: String,
}

impl JwtConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, JwtError> {
        let secret_key = env::var("JWT_SECRET_KEY").map_err(|_| JwtError::MissingSecretKey)?;

        let access_token_expiry_minutes = env::var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| JwtError::ConfigurationError("Invalid access token expiry".to_string()))?;

        let refresh_token_expiry_days = env::var("JWT_REFRESH_TOKEN_EXPIRY_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .map_err(|_| {
                JwtError::ConfigurationError("Invalid refresh token expiry".to_string())
            })?;

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "attendance-backend".to_string());

        Ok(Self {
            secret_key,
            access_token_expiry_minutes,
            refresh_token_expiry_days,
            issuer,
        })
    }

    /// 秘密鍵の検証
    pub fn validate(&self) -> Result<(), JwtError> {
        if self.secret_key.len() < 32 {
            return Err(JwtError::ConfigurationError(
                "JWT secret key must be at least 32 characters".to_string(),
            ));
        }

        if self.access_token_expiry_minutes <= 0 {
            return Err(JwtError::ConfigurationError(
                "Access token expiry must be positive".to_string(),
            ));
        }

        if self.refresh_token_expiry_days <= 0 {
            return Err(JwtError::ConfigurationError(
                "Refresh token expiry must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// JWTトークン管理
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    /// 新しいJwtManagerを作成
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// 環境変数から設定を読み込んでJwtManagerを作成
    pub fn from_env() -> Result<Self, JwtError> {
        let config = JwtConfig::from_env()?;
        Self::new(config)
    }

    /// アクセストークンを生成
    pub fn generate_access_token(&self, user: UserClaims) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.config.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: user.user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            typ: "access".to_string(),
            user,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// リフレッシュトークンを生成
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiry = now + Duration::days(self.config.refresh_token_expiry_days);

        let claims = RefreshTokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            typ: "refresh".to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// アクセストークンを検証
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;

        if data.claims.typ != "access" {
            return Err(JwtError::InvalidToken);
        }

        Ok(data.claims)
    }

    /// リフレッシュトークンを検証し、対象のユーザーIDを返す
    pub fn verify_refresh_token(&self, token: &str) -> Result<Uuid, JwtError> {
        let data = decode::<RefreshTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;

        if data.claims.typ != "refresh" {
            return Err(JwtError::InvalidToken);
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| JwtError::InvalidToken)
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> JwtError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::InvalidToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret_key: "test-secret-key-that-is-long-enough!".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
            issuer: "attendance-backend".to_string(),
        })
        .unwrap()
    }

    fn test_claims() -> UserClaims {
        UserClaims {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            name: Some("Admin".to_string()),
            is_active: true,
            roles: vec!["Super Admin".to_string()],
            state_id: None,
            region_id: None,
            district_id: None,
            group_id: None,
            old_group_id: None,
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let manager = test_manager();
        let claims = test_claims();

        let token = manager.generate_access_token(claims.clone()).unwrap();
        let verified = manager.verify_access_token(&token).unwrap();

        assert_eq!(verified.user.user_id, claims.user_id);
        assert_eq!(verified.user.roles, claims.roles);
        assert_eq!(verified.typ, "access");
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let manager = test_manager();
        let user_id = Uuid::new_v4();

        let token = manager.generate_refresh_token(user_id).unwrap();
        assert_eq!(manager.verify_refresh_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let manager = test_manager();
        let token = manager.generate_refresh_token(Uuid::new_v4()).unwrap();

        assert!(manager.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = JwtManager::new(JwtConfig {
            secret_key: "short".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
            issuer: "attendance-backend".to_string(),
        });

        assert!(result.is_err());
    }
}
