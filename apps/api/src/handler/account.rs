//! # アカウントハンドラ
//!
//! アカウントの取得・更新のエンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `GET /api/user?userId=` - アカウント取得
//! - `PUT /api/user` - アカウント更新（表示名・メールアドレスの全置換）
//!
//! レスポンスにパスワードハッシュは一切含まれない。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use habitflow_domain::account::{Account, AccountId, AccountName, Email};
use habitflow_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    usecase::{AccountUseCase, UpdateAccountInput},
};

/// アカウントハンドラの共有状態
pub struct AccountState {
    pub usecase: Arc<dyn AccountUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// アカウント取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct AccountQuery {
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// アカウント更新リクエスト
///
/// 表示名とメールアドレスを置き換える。パスワードは
/// このエンドポイントでは変更できない。
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub id:    i64,
    pub name:  String,
    pub email: String,
}

/// アカウントレスポンス
///
/// パスワードハッシュを含まない公開表現。
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id:    i64,
    pub name:  String,
    pub email: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id:    account.id().as_i64(),
            name:  account.name().as_str().to_string(),
            email: account.email().as_str().to_string(),
        }
    }
}

// --- ハンドラ ---

/// アカウント取得エンドポイント
///
/// 存在しない ID の場合は 404 Not Found。
#[tracing::instrument(skip_all)]
pub async fn get_account(
    State(state): State<Arc<AccountState>>,
    Query(query): Query<AccountQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .usecase
        .get_account(AccountId::from_i64(query.user_id))
        .await?;

    Ok(Json(ApiResponse::new(AccountResponse::from(&account))))
}

/// アカウント更新エンドポイント
///
/// 表示名とメールアドレスを置き換え、確認メッセージを返す。
#[tracing::instrument(skip_all)]
pub async fn update_account(
    State(state): State<Arc<AccountState>>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = UpdateAccountInput {
        id:    AccountId::from_i64(request.id),
        name:  AccountName::new(request.name)
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        email: Email::new(request.email).map_err(|e| ApiError::Validation(e.to_string()))?,
    };

    state.usecase.update_account(input).await?;

    Ok(Json(ApiResponse::new(
        "アカウントを更新しました".to_string(),
    )))
}
