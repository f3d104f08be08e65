// attendance-backend/src/utils/password.rs

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::env;
use thiserror::Error;

/// パスワード関連のエラー
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingError(argon2::password_hash::Error),

    #[error("Password validation failed: {0}")]
    ValidationError(String),
}

impl From<argon2::password_hash::Error> for PasswordError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::HashingError(err)
    }
}

/// パスワード強度要件
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// 最小文字数
    pub min_length: usize,
    /// 最大文字数
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

impl PasswordPolicy {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Self {
        let min_length = env::var("PASSWORD_MIN_LENGTH")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .unwrap_or(8);

        let max_length = env::var("PASSWORD_MAX_LENGTH")
            .unwrap_or_else(|_| "128".to_string())
            .parse()
            .unwrap_or(128);

        Self {
            min_length,
            max_length,
        }
    }

    /// パスワードがポリシーを満たすか検証
    pub fn check(&self, password: &str) -> Result<(), PasswordError> {
        if password.len() < self.min_length {
            return Err(PasswordError::ValidationError(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        if password.len() > self.max_length {
            return Err(PasswordError::ValidationError(format!(
                "Password must be at most {} characters",
                self.max_length
            )));
        }

        Ok(())
    }
}

/// パスワードをArgon2でハッシュ化
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// パスワードをハッシュと照合
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(password_hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();

        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_policy_length_bounds() {
        let policy = PasswordPolicy::default();

        assert!(policy.check("1234567").is_err());
        assert!(policy.check("12345678").is_ok());
    }
}
