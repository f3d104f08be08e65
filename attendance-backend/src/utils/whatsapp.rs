// attendance-backend/src/utils/whatsapp.rs

use crate::error::{AppError, AppResult};
use serde_json::json;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// WhatsApp送信エラー
#[derive(Error, Debug)]
pub enum WhatsAppError {
    #[error("WhatsApp configuration error: {0}")]
    ConfigurationError(String),
}

/// WhatsApp API 設定（Graph API 形式のメッセージエンドポイント）
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// 送信元電話番号ID
    pub phone_number_id: String,
    /// APIアクセストークン
    pub token: String,
    /// APIベースURL
    pub api_base: String,
    /// 国番号プレフィックス（設定時のみ10桁の番号に前置）
    pub default_country_code: Option<String>,
    /// リクエストタイムアウト（秒）
    pub timeout_secs: u64,
}

impl WhatsAppConfig {
    /// 環境変数から設定を読み込み
    ///
    /// 資格情報が未設定でも起動は妨げない（送信時にAPIエラーとして扱われ、
    /// バッチ側で失敗として記録される）。
    pub fn from_env() -> Result<Self, WhatsAppError> {
        let phone_number_id = env::var("WHATSAPP_PHONE_NUMBER_ID").unwrap_or_default();

        let token = env::var("WHATSAPP_TOKEN").unwrap_or_default();

        let api_base = env::var("WHATSAPP_API_BASE")
            .unwrap_or_else(|_| "https://graph.facebook.com/v17.0".to_string());

        let default_country_code = env::var("WHATSAPP_DEFAULT_COUNTRY_CODE").ok();

        let timeout_secs = env::var("WHATSAPP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| WhatsAppError::ConfigurationError("Invalid timeout".to_string()))?;

        Ok(Self {
            phone_number_id,
            token,
            api_base,
            default_country_code,
            timeout_secs,
        })
    }
}

/// WhatsAppメッセージ送信サービス
pub struct WhatsAppService {
    config: WhatsAppConfig,
    client: reqwest::Client,
}

impl WhatsAppService {
    /// 新しいWhatsAppServiceを作成
    pub fn new(config: WhatsAppConfig) -> Result<Self, WhatsAppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WhatsAppError::ConfigurationError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// 環境変数から設定を読み込んでWhatsAppServiceを作成
    pub fn from_env() -> Result<Self, WhatsAppError> {
        let config = WhatsAppConfig::from_env()?;
        Self::new(config)
    }

    /// テキストメッセージを送信
    pub async fn send_message(&self, to_phone: &str, message: &str) -> AppResult<()> {
        let to_phone = normalize_phone(to_phone, self.config.default_country_code.as_deref());

        let url = format!(
            "{}/{}/messages",
            self.config.api_base, self.config.phone_number_id
        );

        let payload = json!({
            "messaging_product": "whatsapp",
            "to": to_phone,
            "type": "text",
            "text": { "body": message }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("WhatsApp request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "WhatsApp API error");
            return Err(AppError::ExternalServiceError(format!(
                "WhatsApp API returned {}",
                status
            )));
        }

        info!(to_phone = %to_phone, "WhatsApp message sent");
        Ok(())
    }
}

/// 電話番号を送信可能な形式に正規化する
///
/// 国番号プレフィックスが設定されており、番号が素の10桁の場合のみ前置する。
fn normalize_phone(phone: &str, country_code: Option<&str>) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match country_code {
        Some(code) if digits.len() == 10 && !digits.starts_with(code) => {
            format!("{}{}", code, digits)
        }
        _ => digits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefixes_bare_numbers() {
        assert_eq!(normalize_phone("8012345678", Some("234")), "2348012345678");
    }

    #[test]
    fn test_normalize_keeps_prefixed_numbers() {
        assert_eq!(
            normalize_phone("2348012345678", Some("234")),
            "2348012345678"
        );
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize_phone("+234 801 234 5678", None), "2348012345678");
    }

    #[test]
    fn test_normalize_without_country_code() {
        assert_eq!(normalize_phone("8012345678", None), "8012345678");
    }
}
