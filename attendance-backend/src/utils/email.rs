// attendance-backend/src/utils/email.rs

use crate::error::{AppError, AppResult};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;
use thiserror::Error;
use tracing::info;

/// メール送信エラー
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Missing email configuration")]
    MissingConfiguration,
}

/// メール設定
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP サーバーホスト
    pub smtp_host: String,
    /// SMTP サーバーポート
    pub smtp_port: u16,
    /// SMTP ユーザー名
    pub smtp_username: String,
    /// SMTP パスワード
    pub smtp_password: String,
    /// 送信者メールアドレス
    pub from_email: String,
    /// 送信者名
    pub from_name: String,
    /// 開発モードかどうか（ログ出力のみ）
    pub development_mode: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "user".to_string(),
            smtp_password: "password".to_string(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Attendance Backend".to_string(),
            development_mode: true, // 開発環境ではデフォルトで true
        }
    }
}

impl EmailConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, EmailError> {
        let development_mode = env::var("EMAIL_DEVELOPMENT_MODE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        // 開発モードの場合はデフォルト設定を返す
        if development_mode {
            return Ok(Self {
                development_mode: true,
                ..Default::default()
            });
        }

        // 本番環境の設定
        let smtp_host = env::var("SMTP_HOST").map_err(|_| EmailError::MissingConfiguration)?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .map_err(|_| EmailError::ConfigurationError("Invalid SMTP port".to_string()))?;

        let smtp_username =
            env::var("SMTP_USERNAME").map_err(|_| EmailError::MissingConfiguration)?;

        let smtp_password =
            env::var("SMTP_PASSWORD").map_err(|_| EmailError::MissingConfiguration)?;

        let from_email = env::var("FROM_EMAIL").map_err(|_| EmailError::MissingConfiguration)?;

        let from_name = env::var("FROM_NAME").unwrap_or_else(|_| "Attendance Backend".to_string());

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_email,
            from_name,
            development_mode: false,
        })
    }
}

/// メール送信サービス
pub struct EmailService {
    config: EmailConfig,
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl EmailService {
    /// 新しいEmailServiceを作成
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mailer = if config.development_mode {
            None
        } else {
            let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| EmailError::ConfigurationError(e.to_string()))?
                .port(config.smtp_port)
                .credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ))
                .build();
            Some(transport)
        };

        Ok(Self { config, mailer })
    }

    /// 環境変数から設定を読み込んでEmailServiceを作成
    pub fn from_env() -> Result<Self, EmailError> {
        let config = EmailConfig::from_env()?;
        Self::new(config)
    }

    /// テキストメールを送信
    pub async fn send_email(&self, to_email: &str, subject: &str, body: &str) -> AppResult<()> {
        let Some(mailer) = &self.mailer else {
            // 開発モードではログ出力のみ
            info!(
                to_email = %to_email,
                subject = %subject,
                body = %body,
                "EMAIL (development mode)"
            );
            return Ok(());
        };

        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|_| {
                AppError::InternalServerError("Invalid sender email address".to_string())
            })?;

        let to: Mailbox = to_email
            .parse()
            .map_err(|_| AppError::ValidationError(format!("Invalid email address: {}", to_email)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::InternalServerError(format!("Failed to build email: {}", e)))?;

        mailer
            .send(message)
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Failed to send email: {}", e)))?;

        info!(to_email = %to_email, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
