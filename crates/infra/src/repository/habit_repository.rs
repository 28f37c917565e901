//! # HabitRepository
//!
//! 習慣レコードの永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **所有者フィルタ**: 一覧取得は必ず `account_id` で絞り込む
//! - **外部キー違反の変換**: 存在しないアカウントへの INSERT は
//!   `InfraErrorKind::InvalidInput` に変換する
//! - **削除の結果**: `delete` は行が存在したかどうかを bool で返し、
//!   冪等性の扱いはユースケース層に委ねる

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use habitflow_domain::{
    account::AccountId,
    habit::{Frequency, Habit, HabitId, HabitStatus, HabitTitle, NewHabit},
};
use sqlx::PgPool;

use crate::error::InfraError;

/// 習慣リポジトリトレイト
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// ID で習慣を検索
    async fn find_by_id(&self, id: HabitId) -> Result<Option<Habit>, InfraError>;

    /// アカウントに属する習慣の一覧を取得
    ///
    /// 指定アカウントが所有する習慣のみを ID 順で返す。
    /// 習慣が 1 件もない場合は空の Vec を返す。
    async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Habit>, InfraError>;

    /// 習慣を新規保存し、採番済みのエンティティを返す
    ///
    /// 参照先のアカウントが存在しない場合は
    /// `InfraErrorKind::InvalidInput` を返す。
    async fn insert(&self, draft: &NewHabit) -> Result<Habit, InfraError>;

    /// 習慣を上書き保存する
    ///
    /// タイトル・ステータス・更新日時を保存する。
    /// 開始日・頻度・所有者はこの操作では変更しない。
    async fn update(&self, habit: &Habit) -> Result<(), InfraError>;

    /// 習慣を削除する
    ///
    /// # 戻り値
    ///
    /// 行が存在して削除された場合は `true`、
    /// もともと存在しなかった場合は `false`。
    async fn delete(&self, id: HabitId) -> Result<bool, InfraError>;
}

/// habits テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct HabitRow {
    id:         i64,
    account_id: i64,
    title:      String,
    start_date: NaiveDate,
    frequency:  String,
    status:     String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HabitRow {
    fn into_entity(self) -> Result<Habit, InfraError> {
        Ok(Habit::from_db(
            HabitId::from_i64(self.id),
            AccountId::from_i64(self.account_id),
            HabitTitle::new(&self.title).map_err(|e| InfraError::unexpected(e.to_string()))?,
            self.start_date,
            Frequency::new(&self.frequency).map_err(|e| InfraError::unexpected(e.to_string()))?,
            HabitStatus::new(&self.status).map_err(|e| InfraError::unexpected(e.to_string()))?,
            self.created_at,
            self.updated_at,
        ))
    }
}

const SELECT_COLUMNS: &str =
    "id, account_id, title, start_date, frequency, status, created_at, updated_at";

/// PostgreSQL 実装の HabitRepository
#[derive(Debug, Clone)]
pub struct PostgresHabitRepository {
    pool: PgPool,
}

impl PostgresHabitRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HabitRepository for PostgresHabitRepository {
    async fn find_by_id(&self, id: HabitId) -> Result<Option<Habit>, InfraError> {
        let row = sqlx::query_as::<_, HabitRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM habits WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(HabitRow::into_entity).transpose()
    }

    async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Habit>, InfraError> {
        let rows = sqlx::query_as::<_, HabitRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM habits WHERE account_id = $1 ORDER BY id"
        ))
        .bind(account_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HabitRow::into_entity).collect()
    }

    async fn insert(&self, draft: &NewHabit) -> Result<Habit, InfraError> {
        let row = sqlx::query_as::<_, HabitRow>(&format!(
            r#"
            INSERT INTO habits (account_id, title, start_date, frequency, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(draft.account_id.as_i64())
        .bind(draft.title.as_str())
        .bind(draft.start_date)
        .bind(draft.frequency.as_str())
        .bind(draft.status.as_str())
        .bind(draft.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, draft.account_id))?;

        row.into_entity()
    }

    async fn update(&self, habit: &Habit) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE habits
            SET title = $2, status = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(habit.id().as_i64())
        .bind(habit.title().as_str())
        .bind(habit.status().as_str())
        .bind(habit.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: HabitId) -> Result<bool, InfraError> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// 外部キー違反を InvalidInput に変換する
///
/// ユースケース層は事前に所有者の存在を確認するが、確認と INSERT の
/// 間にアカウントが消えるレースは DB 制約でしか検出できない。
fn map_foreign_key_violation(error: sqlx::Error, account_id: AccountId) -> InfraError {
    match &error {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            InfraError::invalid_input(format!("参照先のアカウントが存在しません: {account_id}"))
        }
        _ => error.into(),
    }
}
