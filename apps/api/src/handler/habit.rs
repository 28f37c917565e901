//! # 習慣ハンドラ
//!
//! 習慣の CRUD エンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/habits` - 習慣作成（所有者への参照を含む）
//! - `GET /api/habits?userId=` - 所有者で絞り込んだ習慣一覧
//! - `PUT /api/habits/{id}` - タイトル・ステータスの更新
//! - `DELETE /api/habits/{id}` - 削除（冪等）

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use habitflow_domain::{
    account::AccountId,
    habit::{Frequency, Habit, HabitId, HabitStatus, HabitTitle},
};
use habitflow_shared::ApiResponse;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    usecase::{CreateHabitInput, HabitUseCase, UpdateHabitInput},
};

/// 習慣ハンドラの共有状態
pub struct HabitState {
    pub usecase: Arc<dyn HabitUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// 所有者アカウントへの参照
#[derive(Debug, Deserialize)]
pub struct AccountRef {
    pub id: i64,
}

/// 習慣作成リクエスト
///
/// `user` はネストした所有者参照。`startDate` は省略可能で、
/// 省略時は作成日になる。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    pub title:      String,
    pub start_date: Option<NaiveDate>,
    pub frequency:  String,
    pub status:     String,
    pub user:       AccountRef,
}

/// 習慣一覧のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct HabitQuery {
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// 習慣更新リクエスト
///
/// 変更できるのはタイトルとステータスのみ。
#[derive(Debug, Deserialize)]
pub struct UpdateHabitRequest {
    pub title:  String,
    pub status: String,
}

/// 習慣レスポンス
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitResponse {
    pub id:         i64,
    pub user_id:    i64,
    pub title:      String,
    pub start_date: NaiveDate,
    pub frequency:  String,
    pub status:     String,
}

impl From<&Habit> for HabitResponse {
    fn from(habit: &Habit) -> Self {
        Self {
            id:         habit.id().as_i64(),
            user_id:    habit.account_id().as_i64(),
            title:      habit.title().as_str().to_string(),
            start_date: habit.start_date(),
            frequency:  habit.frequency().as_str().to_string(),
            status:     habit.status().as_str().to_string(),
        }
    }
}

// --- ハンドラ ---

/// 習慣作成エンドポイント
///
/// 成功時は 201 Created と確認メッセージを返す。
/// 参照先のアカウントが存在しない場合は 400 Bad Request。
#[tracing::instrument(skip_all)]
pub async fn create_habit(
    State(state): State<Arc<HabitState>>,
    Json(request): Json<CreateHabitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateHabitInput {
        account_id: AccountId::from_i64(request.user.id),
        title:      HabitTitle::new(request.title)
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        start_date: request.start_date,
        frequency:  Frequency::new(request.frequency)
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        status:     HabitStatus::new(request.status)
            .map_err(|e| ApiError::Validation(e.to_string()))?,
    };

    state.usecase.create_habit(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("習慣を作成しました".to_string())),
    ))
}

/// 習慣一覧エンドポイント
///
/// 指定アカウントが所有する習慣のみを返す。
#[tracing::instrument(skip_all)]
pub async fn list_habits(
    State(state): State<Arc<HabitState>>,
    Query(query): Query<HabitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let habits = state
        .usecase
        .list_habits(AccountId::from_i64(query.user_id))
        .await?;

    let response: Vec<HabitResponse> = habits.iter().map(HabitResponse::from).collect();
    Ok(Json(ApiResponse::new(response)))
}

/// 習慣更新エンドポイント
///
/// 存在しない ID の場合は 404 Not Found。
#[tracing::instrument(skip_all)]
pub async fn update_habit(
    State(state): State<Arc<HabitState>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateHabitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = UpdateHabitInput {
        id:     HabitId::from_i64(id),
        title:  HabitTitle::new(request.title)
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        status: HabitStatus::new(request.status)
            .map_err(|e| ApiError::Validation(e.to_string()))?,
    };

    state.usecase.update_habit(input).await?;

    Ok(Json(ApiResponse::new("習慣を更新しました".to_string())))
}

/// 習慣削除エンドポイント
///
/// 冪等。存在しない ID でも成功レスポンスを返す。
#[tracing::instrument(skip_all)]
pub async fn delete_habit(
    State(state): State<Arc<HabitState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.usecase.delete_habit(HabitId::from_i64(id)).await?;

    Ok(Json(ApiResponse::new("習慣を削除しました".to_string())))
}
