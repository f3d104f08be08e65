// attendance-backend/src/api/dto/attendance_dto.rs

use crate::domain::attendance_status::AttendanceStatus;
use crate::service::reminder_service::ReminderChannel;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 出席提出リクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAttendanceRequest {
    /// 対象ノードの種別タグ（state / region / district / group / old_group）
    #[validate(length(min = 1, message = "entity_type is required"))]
    pub entity_type: String,

    pub entity_id: i32,

    pub week: i32,
}

/// モニター集計の1行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityAttendanceEntry {
    pub id: i32,
    pub name: String,
    pub last_filled_week: i32,
    pub status: AttendanceStatus,
}

/// 全種別の提出状況ダッシュボード
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorSummaryResponse {
    pub states: Vec<EntityAttendanceEntry>,
    pub regions: Vec<EntityAttendanceEntry>,
    pub districts: Vec<EntityAttendanceEntry>,
    pub groups: Vec<EntityAttendanceEntry>,
    pub old_groups: Vec<EntityAttendanceEntry>,
}

/// リマインド実行のクエリパラメータ
///
/// `?channels=email,whatsapp` の形式。省略すると全チャネルに送る。
#[derive(Debug, Default, Deserialize)]
pub struct RemindQuery {
    pub channels: Option<String>,
}

impl RemindQuery {
    /// カンマ区切りのチャネル指定を解釈する
    pub fn requested_channels(&self) -> Result<Vec<ReminderChannel>, String> {
        let Some(raw) = &self.channels else {
            return Ok(ReminderChannel::all());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                ReminderChannel::from_str(part)
                    .ok_or_else(|| format!("Invalid channel: '{}'", part))
            })
            .collect()
    }
}
