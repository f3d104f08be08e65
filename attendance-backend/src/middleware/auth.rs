// attendance-backend/src/middleware/auth.rs

use crate::api::AppState;
use crate::domain::access_scope::AccessScope;
use crate::domain::user_model::UserClaims;
use crate::error::AppError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

/// アクセストークンを格納するCookie名
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// 認証済みユーザー情報を格納するエクステンション
///
/// スコープはトークン検証時に一度だけ解決され、以降のハンドラーは
/// この値だけを参照する。
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: UserClaims,
    scope: AccessScope,
}

impl AuthenticatedUser {
    pub fn new(claims: UserClaims) -> Self {
        let scope = claims.access_scope();
        Self { claims, scope }
    }

    pub fn user_id(&self) -> uuid::Uuid {
        self.claims.user_id
    }

    pub fn scope(&self) -> &AccessScope {
        &self.scope
    }

    /// 指定のロール名のいずれかを要求する
    pub fn require_any_role(&self, names: &[&str]) -> Result<(), AppError> {
        if self.claims.has_any_role(names) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Insufficient role for this operation".to_string(),
            ))
        }
    }

    /// グローバルスコープを要求する
    pub fn require_global_scope(&self) -> Result<(), AppError> {
        if self.scope.is_global() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Global scope is required for this operation".to_string(),
            ))
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// JWT認証ミドルウェア
///
/// Authorization ヘッダーまたは Cookie からアクセストークンを取り出して
/// 検証し、`AuthenticatedUser` をリクエストに注入する。
pub async fn jwt_auth_middleware(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = extract_token(&headers, &cookie_jar).ok_or_else(|| {
        warn!(path = %path, "Missing authentication token");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    let access_claims = app_state
        .jwt_manager
        .verify_access_token(&token)
        .map_err(|e| {
            warn!(path = %path, error = %e, "Invalid access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let user_claims = access_claims.user;

    if !user_claims.is_active {
        warn!(
            user_id = %user_claims.user_id,
            path = %path,
            "Access attempt with inactive account"
        );
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser::new(user_claims));

    Ok(next.run(request).await)
}

/// Authorization: Bearer ヘッダーか Cookie からトークンを取り出す
fn extract_token(headers: &HeaderMap, cookie_jar: &CookieJar) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(value) = auth_header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    cookie_jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}
