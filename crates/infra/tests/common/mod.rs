//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use habitflow_domain::{
    account::{Account, AccountId, AccountName, Email, NewAccount},
    habit::{Frequency, HabitStatus, HabitTitle, NewHabit},
    password::PasswordHash,
};
use habitflow_infra::repository::{AccountRepository, PostgresAccountRepository};
use sqlx::PgPool;

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// テスト用の開始日
pub fn test_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 11, 1).unwrap()
}

/// 未採番のアカウントを作成
pub fn new_account(name: &str, email: &str) -> NewAccount {
    NewAccount::new(
        AccountName::new(name).unwrap(),
        Email::new(email).unwrap(),
        PasswordHash::new("$argon2id$v=19$m=65536,t=1,p=1$dGVzdA$dGVzdA"),
        test_now(),
    )
}

/// アカウントを DB に保存して採番済みエンティティを返す
pub async fn insert_account(pool: &PgPool, name: &str, email: &str) -> Account {
    let repo = PostgresAccountRepository::new(pool.clone());
    repo.insert(&new_account(name, email))
        .await
        .expect("アカウント作成に失敗")
}

/// 未採番の習慣を作成
pub fn new_habit(account_id: AccountId, title: &str) -> NewHabit {
    NewHabit {
        account_id,
        title: HabitTitle::new(title).unwrap(),
        start_date: test_start_date(),
        frequency: Frequency::new("Daily").unwrap(),
        status: HabitStatus::new("Active").unwrap(),
        created_at: test_now(),
    }
}
