// attendance-backend/src/domain/access_scope.rs

use super::hierarchy::{HierarchyKind, HierarchyScoped};
use super::role_model;
use super::user_model;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, QueryFilter, Select};

/// 階層ノードの ID 連鎖（自身のレベルと非正規化された祖先の ID）
///
/// ユーザー行・各ノード行のどちらからも構築でき、スコープ判定は常に
/// この形に正規化してから行う。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeIds {
    pub state_id: Option<i32>,
    pub region_id: Option<i32>,
    pub district_id: Option<i32>,
    pub group_id: Option<i32>,
    pub old_group_id: Option<i32>,
}

impl ScopeIds {
    /// 指定レベルの ID を取得
    pub fn id_at(&self, kind: HierarchyKind) -> Option<i32> {
        match kind {
            HierarchyKind::State => self.state_id,
            HierarchyKind::Region => self.region_id,
            HierarchyKind::District => self.district_id,
            HierarchyKind::Group => self.group_id,
            HierarchyKind::OldGroup => self.old_group_id,
        }
    }

    /// 最深の非 NULL キーのレベル（= スコープレベル）
    pub fn deepest_level(&self) -> Option<HierarchyKind> {
        HierarchyKind::all()
            .into_iter()
            .rev()
            .find(|kind| self.id_at(*kind).is_some())
    }
}

/// スコープノード: ユーザーが参照・変更できる階層の頂点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeNode {
    pub level: HierarchyKind,
    pub ids: ScopeIds,
}

/// 認証時に一度だけ解決されるアクセススコープ
///
/// 5 本の NULL 許容カラムを呼び出し側で場合分けする代わりに、
/// ここで明示的なタグ付き型に畳み込む。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// グローバルスコープロール保持者。フィルタなし
    Global,
    /// 階層ノード配下に制限
    Node(ScopeNode),
    /// 階層未割り当てかつバイパスロールなし。何も見えない
    Empty,
}

impl AccessScope {
    /// ユーザー行とロール名からスコープを構築する
    ///
    /// 深いレベルのキーから順に走査し、最初の非 NULL キーがスコープの
    /// レベルと ID を確定する。
    pub fn resolve(user: &user_model::Model, role_names: &[String]) -> Self {
        let ids = ScopeIds::from(user);
        Self::from_ids(ids, role_names)
    }

    /// 既に取り出し済みの ID 連鎖とロール名から構築する（JWT クレーム用）
    pub fn from_ids(ids: ScopeIds, role_names: &[String]) -> Self {
        if role_names
            .iter()
            .any(|name| role_model::grants_global_scope(name))
        {
            return Self::Global;
        }

        match ids.deepest_level() {
            Some(level) => Self::Node(ScopeNode { level, ids }),
            None => Self::Empty,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// 対象モデルに適用するフィルタ式を生成する
    ///
    /// `None` はフィルタなし。スコープレベルのキーをモデルが持たない場合は
    /// 浅いレベルへ順にフォールバックし、適用可能なキーがひとつもなければ
    /// フィルタなし。`Empty` は恒偽式。純粋関数で I/O は行わない。
    pub fn filter_for<E: HierarchyScoped>(&self) -> Option<SimpleExpr> {
        match self {
            Self::Global => None,
            Self::Empty => Some(Expr::value(false)),
            Self::Node(node) => {
                for kind in node.level.fallback_chain() {
                    if let (Some(column), Some(id)) =
                        (E::hierarchy_column(kind), node.ids.id_at(kind))
                    {
                        return Some(column.eq(id));
                    }
                }
                None
            }
        }
    }

    /// 書き込み対象の行がスコープ内かチェックする
    ///
    /// フィルタ生成と同じフォールバック規則で、両者が ID を持つ最深レベルの
    /// 一致を要求する。
    pub fn permits(&self, row: &ScopeIds) -> bool {
        match self {
            Self::Global => true,
            Self::Empty => false,
            Self::Node(node) => {
                for kind in node.level.fallback_chain() {
                    if let (Some(row_id), Some(scope_id)) =
                        (row.id_at(kind), node.ids.id_at(kind))
                    {
                        return row_id == scope_id;
                    }
                }
                true
            }
        }
    }
}

/// クエリにスコープフィルタを適用する
pub fn scoped<E: HierarchyScoped>(select: Select<E>, scope: &AccessScope) -> Select<E> {
    match scope.filter_for::<E>() {
        Some(expr) => select.filter(expr),
        None => select,
    }
}

impl From<&user_model::Model> for ScopeIds {
    fn from(user: &user_model::Model) -> Self {
        Self {
            state_id: user.state_id,
            region_id: user.region_id,
            district_id: user.district_id,
            group_id: user.group_id,
            old_group_id: user.old_group_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{district_model, group_model, region_model, state_model, user_model};
    use chrono::Utc;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};
    use uuid::Uuid;

    fn user_with_scope(
        state_id: Option<i32>,
        region_id: Option<i32>,
        district_id: Option<i32>,
    ) -> user_model::Model {
        user_model::Model {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: None,
            phone: None,
            is_active: true,
            state_id,
            region_id,
            district_id,
            group_id: None,
            old_group_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sql<E: HierarchyScoped>(scope: &AccessScope) -> String {
        scoped(E::find(), scope)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_district_user_resolves_to_district_scope() {
        let user = user_with_scope(Some(1), Some(3), Some(7));
        let scope = AccessScope::resolve(&user, &["District Admin".to_string()]);

        match scope {
            AccessScope::Node(node) => {
                assert_eq!(node.level, HierarchyKind::District);
                assert_eq!(node.ids.district_id, Some(7));
            }
            other => panic!("expected district scope, got {:?}", other),
        }
    }

    #[test]
    fn test_district_scope_filters_exactly_on_district_id() {
        // district_id を持つモデルには district_id = 7 のみが適用され、
        // region_id / state_id が設定されていても無視される
        let user = user_with_scope(Some(1), Some(3), Some(7));
        let scope = AccessScope::resolve(&user, &[]);

        let sql = sql::<group_model::Entity>(&scope);
        assert!(sql.contains(r#""district_id" = 7"#), "sql was: {}", sql);
        assert!(!sql.contains("region_id"), "sql was: {}", sql);
        assert!(!sql.contains("state_id"), "sql was: {}", sql);
    }

    #[test]
    fn test_super_admin_bypasses_all_filters() {
        let user = user_with_scope(Some(1), Some(3), Some(7));
        let scope = AccessScope::resolve(&user, &["Super Admin".to_string()]);

        assert!(scope.is_global());
        let sql = sql::<group_model::Entity>(&scope);
        assert!(!sql.contains("WHERE"), "sql was: {}", sql);
    }

    #[test]
    fn test_bypass_role_name_is_case_sensitive() {
        let user = user_with_scope(None, None, None);
        let scope = AccessScope::resolve(&user, &["super admin".to_string()]);

        assert_eq!(scope, AccessScope::Empty);
    }

    #[test]
    fn test_unscoped_user_sees_nothing() {
        let user = user_with_scope(None, None, None);
        let scope = AccessScope::resolve(&user, &["Member".to_string()]);

        assert_eq!(scope, AccessScope::Empty);
        let sql = sql::<state_model::Entity>(&scope);
        assert!(sql.contains("FALSE"), "sql was: {}", sql);
    }

    #[test]
    fn test_fallback_to_less_specific_key() {
        // district スコープのユーザーが regions を見るとき、regions は
        // district キーを持たないので region レベル（regions.id）に落ちる
        let user = user_with_scope(Some(1), Some(3), Some(7));
        let scope = AccessScope::resolve(&user, &[]);

        let sql = sql::<region_model::Entity>(&scope);
        assert!(sql.contains(r#""id" = 3"#), "sql was: {}", sql);
    }

    #[test]
    fn test_no_applicable_key_applies_no_filter() {
        // region のみ設定されたユーザー（state_id なし）が states を見るとき、
        // 適用可能なキーが存在しないのでフィルタなし
        let user = user_with_scope(None, Some(3), None);
        let scope = AccessScope::resolve(&user, &[]);

        let sql = sql::<state_model::Entity>(&scope);
        assert!(!sql.contains("WHERE"), "sql was: {}", sql);
    }

    #[test]
    fn test_scope_level_prefers_deepest_key() {
        let user = user_model::Model {
            group_id: Some(11),
            old_group_id: Some(23),
            ..user_with_scope(Some(1), Some(3), None)
        };
        let scope = AccessScope::resolve(&user, &[]);

        match scope {
            AccessScope::Node(node) => assert_eq!(node.level, HierarchyKind::OldGroup),
            other => panic!("expected node scope, got {:?}", other),
        }
    }

    #[test]
    fn test_permits_matching_district_row() {
        let user = user_with_scope(Some(1), Some(3), Some(7));
        let scope = AccessScope::resolve(&user, &[]);

        let own_district = district_model::Model {
            id: 7,
            name: "Obio-Akpor".to_string(),
            code: "OBA".to_string(),
            leader: None,
            state_id: 1,
            region_id: 3,
        };
        let other_district = district_model::Model {
            id: 8,
            ..own_district.clone()
        };

        assert!(scope.permits(&ScopeIds::from(&own_district)));
        assert!(!scope.permits(&ScopeIds::from(&other_district)));
    }

    #[test]
    fn test_permits_global_and_empty() {
        let row = ScopeIds {
            state_id: Some(1),
            ..Default::default()
        };
        assert!(AccessScope::Global.permits(&row));
        assert!(!AccessScope::Empty.permits(&row));
    }
}
