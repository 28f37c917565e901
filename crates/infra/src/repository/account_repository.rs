//! # AccountRepository
//!
//! アカウント情報の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **ID は DB 採番**: INSERT は `RETURNING` で採番済みのエンティティを返す
//! - **一意制約の変換**: `accounts.email` の UNIQUE 違反は
//!   `InfraErrorKind::Conflict` に変換し、ユースケース層で競合として扱う

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use habitflow_domain::{
    account::{Account, AccountId, AccountName, Email, NewAccount},
    password::PasswordHash,
};
use sqlx::PgPool;

use crate::error::InfraError;

/// アカウントリポジトリトレイト
///
/// アカウント情報の永続化操作を定義する。
/// インフラ層で具体的な実装を提供し、ユースケース層から利用する。
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// ID でアカウントを検索
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(account))`: アカウントが見つかった場合
    /// - `Ok(None)`: アカウントが見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, InfraError>;

    /// メールアドレスでアカウントを検索
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, InfraError>;

    /// アカウントを新規保存し、採番済みのエンティティを返す
    ///
    /// メールアドレスの一意制約に違反した場合は
    /// `InfraErrorKind::Conflict` を返す。
    async fn insert(&self, draft: &NewAccount) -> Result<Account, InfraError>;

    /// アカウントを上書き保存する
    ///
    /// 表示名・メールアドレス・更新日時を保存する。
    /// パスワードハッシュはこの操作では変更しない。
    async fn update(&self, account: &Account) -> Result<(), InfraError>;
}

/// accounts テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id:            i64,
    name:          String,
    email:         String,
    password_hash: String,
    created_at:    DateTime<Utc>,
    updated_at:    DateTime<Utc>,
}

impl AccountRow {
    fn into_entity(self) -> Result<Account, InfraError> {
        Ok(Account::from_db(
            AccountId::from_i64(self.id),
            AccountName::new(&self.name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            Email::new(&self.email).map_err(|e| InfraError::unexpected(e.to_string()))?,
            PasswordHash::new(self.password_hash),
            self.created_at,
            self.updated_at,
        ))
    }
}

const SELECT_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

/// PostgreSQL 実装の AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, InfraError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_entity).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, InfraError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_entity).transpose()
    }

    async fn insert(&self, draft: &NewAccount) -> Result<Account, InfraError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(draft.name.as_str())
        .bind(draft.email.as_str())
        .bind(draft.password_hash.as_str())
        .bind(draft.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &draft.email))?;

        row.into_entity()
    }

    async fn update(&self, account: &Account) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET name = $2, email = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(account.id().as_i64())
        .bind(account.name().as_str())
        .bind(account.email().as_str())
        .bind(account.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, account.email()))?;

        Ok(())
    }
}

/// UNIQUE 制約違反を Conflict に変換する
///
/// ユースケース層は事前に重複チェックを行うが、同時登録の競合は
/// DB 制約でしか検出できないため、ここでも変換する。
fn map_unique_violation(error: sqlx::Error, email: &Email) -> InfraError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            InfraError::conflict("Account", format!("email={email}"))
        }
        _ => error.into(),
    }
}
