// attendance-backend/src/service/reminder_service.rs

use crate::domain::attendance_status::AttendanceStatus;
use crate::domain::hierarchy::HierarchyKind;
use crate::domain::user_model::Model as User;
use crate::error::{AppError, AppResult};
use crate::repository::attendance_repository::AttendanceRepository;
use crate::repository::hierarchy_repository::HierarchyRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::email::EmailService;
use crate::utils::whatsapp::WhatsAppService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// リマインド通知の送信チャネル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderChannel {
    Email,
    Whatsapp,
}

impl ReminderChannel {
    pub fn all() -> Vec<Self> {
        vec![Self::Email, Self::Whatsapp]
    }

    /// 文字列からReminderChannelに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "whatsapp" => Some(Self::Whatsapp),
            _ => None,
        }
    }
}

/// 通知トランスポートの共通契約
///
/// `send(recipient, message)` が成功か失敗かだけを返す。リトライは
/// トランスポート側の責務で、この層では行わない。
#[async_trait::async_trait]
pub trait ReminderTransport: Send + Sync {
    async fn send(&self, recipient: &str, message: &str) -> AppResult<()>;
}

#[async_trait::async_trait]
impl ReminderTransport for EmailService {
    async fn send(&self, recipient: &str, message: &str) -> AppResult<()> {
        self.send_email(recipient, "Attendance Reminder", message)
            .await
    }
}

#[async_trait::async_trait]
impl ReminderTransport for WhatsAppService {
    async fn send(&self, recipient: &str, message: &str) -> AppResult<()> {
        self.send_message(recipient, message).await
    }
}

/// ユーザーごとの送信結果
///
/// 要求されなかったチャネルは None（「未試行」と「失敗」を区別する）。
#[derive(Debug, Clone, Serialize)]
pub struct UserReminderResult {
    pub user_id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_sent: Option<bool>,
}

/// リマインドバッチの集計結果
///
/// failed には要求された全チャネルが失敗したユーザーのみが入る。
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReminderSummary {
    pub notified: usize,
    pub results: Vec<UserReminderResult>,
    pub failed: Vec<String>,
}

/// トランスポートだけに依存する送信部
///
/// チャネルごとの失敗はユーザー単位で隔離し、バッチ全体は常に完走する。
pub struct ReminderDispatcher {
    email: Arc<dyn ReminderTransport>,
    whatsapp: Arc<dyn ReminderTransport>,
    send_timeout: Duration,
}

impl ReminderDispatcher {
    pub fn new(
        email: Arc<dyn ReminderTransport>,
        whatsapp: Arc<dyn ReminderTransport>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            email,
            whatsapp,
            send_timeout,
        }
    }

    /// 候補ユーザー全員に要求されたチャネルで通知を送る
    pub async fn dispatch(
        &self,
        users: &[User],
        channels: &[ReminderChannel],
        current_week: i32,
    ) -> ReminderSummary {
        let mut summary = ReminderSummary {
            notified: users.len(),
            ..Default::default()
        };

        for user in users {
            let greeting_name = user.name.as_deref().unwrap_or(&user.email);

            let mut result = UserReminderResult {
                user_id: user.id,
                email: user.email.clone(),
                email_sent: None,
                whatsapp_sent: None,
            };

            if channels.contains(&ReminderChannel::Email) {
                let message = email_reminder_body(greeting_name, current_week);
                result.email_sent = Some(self.try_send(&*self.email, &user.email, &message).await);
            }

            if channels.contains(&ReminderChannel::Whatsapp) {
                // 電話番号のないユーザーはこのチャネルでは届けられない
                result.whatsapp_sent = Some(match &user.phone {
                    Some(phone) => {
                        let message = whatsapp_reminder_body(greeting_name, current_week);
                        self.try_send(&*self.whatsapp, phone, &message).await
                    }
                    None => false,
                });
            }

            let attempted: Vec<bool> = [result.email_sent, result.whatsapp_sent]
                .into_iter()
                .flatten()
                .collect();

            if !attempted.is_empty() && attempted.iter().all(|sent| !sent) {
                summary.failed.push(user.email.clone());
            }

            summary.results.push(result);
        }

        summary
    }

    /// 1チャネル分の送信。失敗・タイムアウトは false に畳む
    async fn try_send(&self, transport: &dyn ReminderTransport, recipient: &str, message: &str) -> bool {
        match tokio::time::timeout(self.send_timeout, transport.send(recipient, message)).await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                warn!(recipient = %recipient, error = %err, "Reminder delivery failed");
                false
            }
            Err(_) => {
                warn!(recipient = %recipient, "Reminder delivery timed out");
                false
            }
        }
    }
}

/// リマインド通知サービス
pub struct ReminderService {
    user_repo: Arc<UserRepository>,
    attendance_repo: Arc<AttendanceRepository>,
    hierarchy_repo: Arc<HierarchyRepository>,
    dispatcher: ReminderDispatcher,
}

impl ReminderService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        hierarchy_repo: Arc<HierarchyRepository>,
        dispatcher: ReminderDispatcher,
    ) -> Self {
        Self {
            user_repo,
            attendance_repo,
            hierarchy_repo,
            dispatcher,
        }
    }

    /// 一斉リマインド
    ///
    /// 全ユーザーを走査し、各ユーザー自身の州に対する指定種別の提出状況を
    /// 評価して、遅れているユーザーだけに通知する。州が未設定のユーザーは
    /// 未提出（週 0）として扱う。
    pub async fn remind_broad(
        &self,
        kind: HierarchyKind,
        channels: &[ReminderChannel],
        current_week: i32,
    ) -> AppResult<ReminderSummary> {
        let users = self.user_repo.find_all().await?;

        let mut candidates = Vec::new();
        for user in users {
            let last_week = match user.state_id {
                Some(state_id) => self.attendance_repo.max_week(kind, state_id).await?,
                None => 0,
            };

            if AttendanceStatus::classify(last_week, current_week).is_stale() {
                candidates.push(user);
            }
        }

        info!(
            entity_kind = %kind,
            candidates = %candidates.len(),
            "Dispatching broad reminders"
        );
        Ok(self.dispatcher.dispatch(&candidates, channels, current_week).await)
    }

    /// 対象リマインド
    ///
    /// 指定ノードの提出状況を評価し、遅れている場合のみそのノードに直接
    /// 紐づくユーザーへ通知する。
    pub async fn remind_targeted(
        &self,
        kind: HierarchyKind,
        entity_id: i32,
        channels: &[ReminderChannel],
        current_week: i32,
    ) -> AppResult<ReminderSummary> {
        if !self.hierarchy_repo.exists(kind, entity_id).await? {
            return Err(AppError::NotFound(format!(
                "{} not found",
                kind.display_name()
            )));
        }

        let last_week = self.attendance_repo.max_week(kind, entity_id).await?;
        if !AttendanceStatus::classify(last_week, current_week).is_stale() {
            info!(
                entity_kind = %kind,
                entity_id = %entity_id,
                "Attendance is up to date, no reminders sent"
            );
            return Ok(ReminderSummary::default());
        }

        let users = self.user_repo.find_attached_to(kind, entity_id).await?;

        info!(
            entity_kind = %kind,
            entity_id = %entity_id,
            candidates = %users.len(),
            "Dispatching targeted reminders"
        );
        Ok(self.dispatcher.dispatch(&users, channels, current_week).await)
    }
}

fn email_reminder_body(name: &str, week: i32) -> String {
    format!(
        "Dear {},\n\nYou have not submitted attendance for week {}. Kindly log in to the system and update it at your earliest convenience.\n\nThank you!",
        name, week
    )
}

fn whatsapp_reminder_body(name: &str, week: i32) -> String {
    format!(
        "Hello {},\n\nAttendance Reminder\n\nThis is a friendly reminder to submit your attendance for week {}.\n\nPlease log in to the system and complete your attendance at your earliest convenience.\n\nThank you!",
        name, week
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// 指定した宛先だけ失敗するモックトランスポート
    struct MockTransport {
        fail_for: HashSet<String>,
        sent: Mutex<Vec<String>>,
    }

    impl MockTransport {
        fn new(fail_for: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                fail_for: fail_for.iter().map(|s| s.to_string()).collect(),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn sent_to(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ReminderTransport for MockTransport {
        async fn send(&self, recipient: &str, _message: &str) -> AppResult<()> {
            if self.fail_for.contains(recipient) {
                return Err(AppError::ExternalServiceError(
                    "transport unavailable".to_string(),
                ));
            }
            self.sent.lock().unwrap().push(recipient.to_string());
            Ok(())
        }
    }

    fn test_user(email: &str, phone: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: Some("Test User".to_string()),
            phone: phone.map(|p| p.to_string()),
            is_active: true,
            state_id: Some(1),
            region_id: None,
            district_id: None,
            group_id: None,
            old_group_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dispatcher(
        email: Arc<MockTransport>,
        whatsapp: Arc<MockTransport>,
    ) -> ReminderDispatcher {
        ReminderDispatcher::new(email, whatsapp, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_partial_channel_failure_is_not_a_user_failure() {
        // ユーザーAのWhatsAppだけ失敗、メールは両者成功
        let email = MockTransport::new(&[]);
        let whatsapp = MockTransport::new(&["111"]);
        let users = vec![test_user("a@example.com", Some("111")), test_user("b@example.com", Some("222"))];

        let summary = dispatcher(email.clone(), whatsapp.clone())
            .dispatch(&users, &ReminderChannel::all(), 20)
            .await;

        assert!(summary.failed.is_empty());
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.results[0].email_sent, Some(true));
        assert_eq!(summary.results[0].whatsapp_sent, Some(false));
        assert_eq!(summary.results[1].email_sent, Some(true));
        assert_eq!(summary.results[1].whatsapp_sent, Some(true));
    }

    #[tokio::test]
    async fn test_all_channels_failed_user_is_reported() {
        let email = MockTransport::new(&["a@example.com"]);
        let whatsapp = MockTransport::new(&["111"]);
        let users = vec![test_user("a@example.com", Some("111"))];

        let summary = dispatcher(email, whatsapp)
            .dispatch(&users, &ReminderChannel::all(), 20)
            .await;

        assert_eq!(summary.failed, vec!["a@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_one_user_failure_does_not_abort_the_batch() {
        let email = MockTransport::new(&["a@example.com"]);
        let whatsapp = MockTransport::new(&[]);
        let users = vec![
            test_user("a@example.com", None),
            test_user("b@example.com", None),
            test_user("c@example.com", None),
        ];

        let summary = dispatcher(email.clone(), whatsapp)
            .dispatch(&users, &[ReminderChannel::Email], 20)
            .await;

        assert_eq!(summary.results.len(), 3);
        assert_eq!(summary.failed, vec!["a@example.com".to_string()]);
        assert_eq!(
            email.sent_to(),
            vec!["b@example.com".to_string(), "c@example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unrequested_channel_is_not_attempted() {
        let email = MockTransport::new(&[]);
        let whatsapp = MockTransport::new(&[]);
        let users = vec![test_user("a@example.com", Some("111"))];

        let summary = dispatcher(email, whatsapp.clone())
            .dispatch(&users, &[ReminderChannel::Email], 20)
            .await;

        assert_eq!(summary.results[0].email_sent, Some(true));
        assert_eq!(summary.results[0].whatsapp_sent, None);
        assert!(whatsapp.sent_to().is_empty());
    }

    #[tokio::test]
    async fn test_missing_phone_counts_as_whatsapp_failure() {
        let email = MockTransport::new(&["a@example.com"]);
        let whatsapp = MockTransport::new(&[]);
        let users = vec![test_user("a@example.com", None)];

        let summary = dispatcher(email, whatsapp)
            .dispatch(&users, &ReminderChannel::all(), 20)
            .await;

        assert_eq!(summary.results[0].whatsapp_sent, Some(false));
        assert_eq!(summary.failed, vec!["a@example.com".to_string()]);
    }
}
