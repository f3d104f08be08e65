// attendance-backend/src/domain/attendance_status.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 出席提出状況の分類
///
/// Green = 当該週まで提出済み、Yellow = 1週遅れ、Red = 2週以上遅れか未提出。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Green,
    Yellow,
    Red,
}

impl AttendanceStatus {
    /// 最終提出週と現在週から状況を分類する純粋関数
    ///
    /// `last_filled_week <= 0` は「提出レコードなし」の番兵値。
    pub fn classify(last_filled_week: i32, current_week: i32) -> Self {
        if last_filled_week <= 0 {
            return Self::Red;
        }

        match current_week - last_filled_week {
            behind if behind >= 2 => Self::Red,
            1 => Self::Yellow,
            // 当該週またはそれ以降の週を提出済み
            _ => Self::Green,
        }
    }

    /// AttendanceStatusを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    /// 提出が遅れている（リマインド対象）かチェック
    pub fn is_stale(&self) -> bool {
        !matches!(self, Self::Green)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_WEEK: i32 = 20;

    #[test]
    fn test_no_record_is_red() {
        assert_eq!(
            AttendanceStatus::classify(0, CURRENT_WEEK),
            AttendanceStatus::Red
        );
    }

    #[test]
    fn test_current_week_is_green() {
        assert_eq!(
            AttendanceStatus::classify(CURRENT_WEEK, CURRENT_WEEK),
            AttendanceStatus::Green
        );
    }

    #[test]
    fn test_one_week_behind_is_yellow() {
        assert_eq!(
            AttendanceStatus::classify(CURRENT_WEEK - 1, CURRENT_WEEK),
            AttendanceStatus::Yellow
        );
    }

    #[test]
    fn test_two_weeks_behind_is_red() {
        // ちょうど閾値
        assert_eq!(
            AttendanceStatus::classify(CURRENT_WEEK - 2, CURRENT_WEEK),
            AttendanceStatus::Red
        );
        assert_eq!(
            AttendanceStatus::classify(1, CURRENT_WEEK),
            AttendanceStatus::Red
        );
    }

    #[test]
    fn test_future_week_is_green() {
        // 翌週分を先に提出していても Green 扱い
        assert_eq!(
            AttendanceStatus::classify(CURRENT_WEEK + 1, CURRENT_WEEK),
            AttendanceStatus::Green
        );
    }

    #[test]
    fn test_is_stale() {
        assert!(!AttendanceStatus::Green.is_stale());
        assert!(AttendanceStatus::Yellow.is_stale());
        assert!(AttendanceStatus::Red.is_stale());
    }

    #[test]
    fn test_serde() {
        let serialized = serde_json::to_string(&AttendanceStatus::Yellow).unwrap();
        assert_eq!(serialized, r#""yellow""#);
    }
}
