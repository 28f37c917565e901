//! # 認証ミドルウェア
//!
//! `Authorization: Bearer {token}` ヘッダを検証し、
//! 有効なセッションを持たないリクエストを 401 で遮断する。
//!
//! ## 設計方針
//!
//! - 登録とログイン以外の `/api` 配下はすべてこのミドルウェアを通す
//! - トークンの実体は Redis 上のセッション
//!   （[`SessionManager`](habitflow_infra::SessionManager)）で管理する
//! - セッションストア自体の障害は 401 ではなく 500 として返す
//!   （認証失敗と運用障害を混同させない）

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use habitflow_infra::SessionManager;

use crate::error::ApiError;

/// 認証ミドルウェアの共有状態
#[derive(Clone)]
pub struct AuthnState {
    pub session_manager: Arc<dyn SessionManager>,
}

/// Authorization ヘッダからベアラートークンを取り出す
///
/// ヘッダが存在しない、または `Bearer ` 形式でない場合は `None`。
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// セッション検証ミドルウェア
///
/// トークンが提示されていない、またはセッションが存在しない場合は
/// 401 Unauthorized を返し、後続のハンドラを実行しない。
pub async fn require_session(
    State(state): State<AuthnState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return ApiError::Unauthorized("認証トークンが指定されていません".to_string())
            .into_response();
    };

    match state.session_manager.get(token).await {
        Ok(Some(_session)) => next.run(request).await,
        Ok(None) => {
            ApiError::Unauthorized("セッションが無効です".to_string()).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
