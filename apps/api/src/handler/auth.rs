//! # 認証ハンドラ
//!
//! 登録・ログイン・ログアウトのエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/register` - アカウント登録（認証不要）
//! - `POST /api/login` - ログインとトークン発行（認証不要）
//! - `POST /api/logout` - セッション破棄

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use habitflow_domain::{
    account::{AccountName, Email},
    password::PlainPassword,
};
use habitflow_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::bearer_token,
    usecase::{AuthUseCase, RegisterInput},
};

/// 認証ハンドラの共有状態
pub struct AuthState {
    pub usecase: Arc<dyn AuthUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// アカウント登録リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name:     String,
    pub email:    String,
    pub password: String,
}

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email:    String,
    pub password: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// 発行されたベアラートークン
    pub token:      String,
    /// ログインしたアカウントの ID
    pub account_id: i64,
}

// --- ハンドラ ---

/// アカウント登録エンドポイント
///
/// 成功時は 201 Created と確認メッセージを返す。
/// メールアドレスが既に使用されている場合は 409 Conflict。
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = RegisterInput {
        name:     AccountName::new(request.name)
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        email:    Email::new(request.email).map_err(|e| ApiError::Validation(e.to_string()))?,
        password: PlainPassword::new(request.password),
    };

    state.usecase.register(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("アカウントを登録しました".to_string())),
    ))
}

/// ログインエンドポイント
///
/// 認証に成功するとベアラートークンを発行する。
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = Email::new(request.email).map_err(|e| ApiError::Validation(e.to_string()))?;
    let password = PlainPassword::new(request.password);

    let output = state.usecase.login(email, password).await?;

    Ok(Json(ApiResponse::new(LoginResponse {
        token:      output.token,
        account_id: output.account.id().as_i64(),
    })))
}

/// ログアウトエンドポイント
///
/// 提示されたトークンのセッションを破棄する。冪等。
#[tracing::instrument(skip_all)]
pub async fn logout(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        ApiError::Unauthorized("認証トークンが指定されていません".to_string())
    })?;

    state.usecase.logout(token).await?;

    Ok(Json(ApiResponse::new("ログアウトしました".to_string())))
}
