//! # API エラー定義
//!
//! API サーバー固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! ## 設計方針
//!
//! - レスポンス形式は RFC 9457 Problem Details
//!   （[`ErrorResponse`](habitflow_shared::ErrorResponse)）に統一する
//! - `InfraError` は種別に応じて 409 / 400 / 500 に振り分ける
//!   （`From` 実装で変換するため、ユースケース層は `?` を書くだけでよい）
//! - 500 のときだけ詳細をログに出し、レスポンスには固定文言を返す

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use habitflow_infra::{InfraError, InfraErrorKind};
use habitflow_shared::ErrorResponse;
use thiserror::Error;

/// API サーバーで発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力値の検証エラー
    #[error("検証エラー: {0}")]
    Validation(String),

    /// 不正なリクエスト（存在しない参照など）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 認証エラー
    #[error("認証エラー: {0}")]
    Unauthorized(String),

    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 競合（一意制約違反など）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// インフラ層エラー（DB / Redis）
    #[error("インフラエラー: {0}")]
    Infra(InfraError),
}

impl From<InfraError> for ApiError {
    /// インフラ層のエラー種別を API のエラー分類へ写像する
    ///
    /// - 一意制約違反 → `Conflict`（409）
    /// - 外部キー違反 → `BadRequest`（400）
    /// - それ以外 → `Infra`（500）
    fn from(error: InfraError) -> Self {
        match error.kind() {
            InfraErrorKind::Conflict { entity, detail } => {
                ApiError::Conflict(format!("{entity} が重複しています: {detail}"))
            }
            InfraErrorKind::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            _ => ApiError::Infra(error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::Validation(msg) => ErrorResponse::validation_error(msg.clone()),
            ApiError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            ApiError::Unauthorized(msg) => ErrorResponse::unauthorized(msg.clone()),
            ApiError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            ApiError::Conflict(msg) => ErrorResponse::conflict(msg.clone()),
            ApiError::Infra(e) => {
                tracing::error!(span_trace = %e.span_trace(), "インフラエラー: {}", e);
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
