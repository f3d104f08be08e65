// attendance-backend/src/utils/validation.rs

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// 階層ノードコードの形式（英数字とハイフン、2〜20文字）
static ENTITY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{1,19}$").expect("valid regex"));

/// 年内の週番号の範囲（ISO週）
pub const MIN_WEEK: i32 = 1;
pub const MAX_WEEK: i32 = 53;

/// ノードコードのバリデーション（validator derive用）
pub fn validate_entity_code(code: &str) -> Result<(), ValidationError> {
    if ENTITY_CODE_RE.is_match(code) {
        Ok(())
    } else {
        let mut error = ValidationError::new("entity_code");
        error.message = Some("Code must be 2-20 alphanumeric characters or hyphens".into());
        Err(error)
    }
}

/// 週番号が有効範囲内かチェック
pub fn is_valid_week(week: i32) -> bool {
    (MIN_WEEK..=MAX_WEEK).contains(&week)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes() {
        assert!(validate_entity_code("RIV-CEN").is_ok());
        assert!(validate_entity_code("PH01").is_ok());
    }

    #[test]
    fn test_invalid_codes() {
        assert!(validate_entity_code("").is_err());
        assert!(validate_entity_code("X").is_err());
        assert!(validate_entity_code("-leading").is_err());
        assert!(validate_entity_code("has space").is_err());
    }

    #[test]
    fn test_week_range() {
        assert!(is_valid_week(1));
        assert!(is_valid_week(53));
        assert!(!is_valid_week(0));
        assert!(!is_valid_week(54));
    }
}
