// attendance-backend/src/domain/hierarchy.rs

use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 階層の種別を表すタグ（浅い順: State → Region → District → Group → OldGroup）
///
/// 出席レコードの entity_kind 列とユーザーのスコープレベルの両方で使用する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyKind {
    State,
    Region,
    District,
    Group,
    OldGroup,
}

impl HierarchyKind {
    /// 文字列からHierarchyKindに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "state" => Some(Self::State),
            "region" => Some(Self::Region),
            "district" => Some(Self::District),
            "group" => Some(Self::Group),
            "old_group" => Some(Self::OldGroup),
            _ => None,
        }
    }

    /// HierarchyKindを文字列として取得
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Region => "region",
            Self::District => "district",
            Self::Group => "group",
            Self::OldGroup => "old_group",
        }
    }

    /// すべての種別を浅い順で取得
    pub fn all() -> [Self; 5] {
        [
            Self::State,
            Self::Region,
            Self::District,
            Self::Group,
            Self::OldGroup,
        ]
    }

    /// 表示名を取得
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::State => "State",
            Self::Region => "Region",
            Self::District => "District",
            Self::Group => "Group",
            Self::OldGroup => "Old group",
        }
    }

    /// 木構造上の深さ（State = 1 が最浅）
    pub fn depth(&self) -> u8 {
        match self {
            Self::State => 1,
            Self::Region => 2,
            Self::District => 3,
            Self::Group => 4,
            Self::OldGroup => 5,
        }
    }

    /// 自身から根に向かうフォールバック順（自身 → 親 → … → State）
    pub fn fallback_chain(&self) -> impl Iterator<Item = HierarchyKind> {
        let own_depth = self.depth();
        Self::all()
            .into_iter()
            .rev()
            .filter(move |kind| kind.depth() <= own_depth)
    }
}

impl fmt::Display for HierarchyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HierarchyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s).ok_or_else(|| {
            format!(
                "Invalid entity type: '{}'. Valid types are: {}",
                s,
                Self::all()
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

/// 階層外部キーを持つエンティティのカラム記述子
///
/// スコープフィルタはこの記述子を通じて「モデルがどのレベルのキーを持つか」を
/// 知る。ノード自身のレベルは主キー列にマッピングされる（districts にとっての
/// district_id は districts.id）。持たないレベルは None。
pub trait HierarchyScoped: EntityTrait {
    fn hierarchy_column(kind: HierarchyKind) -> Option<Self::Column>;
}

/// 階層ノード（5種のエンティティ）に共通する記述子
pub trait HierarchyNode: HierarchyScoped {
    const KIND: HierarchyKind;

    fn id_column() -> Self::Column;
    fn name_column() -> Self::Column;
    fn code_column() -> Self::Column;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(HierarchyKind::from_str("state"), Some(HierarchyKind::State));
        assert_eq!(
            HierarchyKind::from_str("old_group"),
            Some(HierarchyKind::OldGroup)
        );
        assert_eq!(HierarchyKind::from_str("STATE"), None);
        assert_eq!(HierarchyKind::from_str("village"), None);
    }

    #[test]
    fn test_depth_order() {
        let all = HierarchyKind::all();
        for pair in all.windows(2) {
            assert!(pair[0].depth() < pair[1].depth());
        }
    }

    #[test]
    fn test_fallback_chain() {
        let chain: Vec<_> = HierarchyKind::District.fallback_chain().collect();
        assert_eq!(
            chain,
            vec![
                HierarchyKind::District,
                HierarchyKind::Region,
                HierarchyKind::State
            ]
        );

        let chain: Vec<_> = HierarchyKind::State.fallback_chain().collect();
        assert_eq!(chain, vec![HierarchyKind::State]);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "group".parse::<HierarchyKind>().unwrap(),
            HierarchyKind::Group
        );
        assert!("invalid".parse::<HierarchyKind>().is_err());
    }
}
