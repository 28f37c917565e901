//! # 習慣
//!
//! トラッキング対象の習慣を表すエンティティと関連する値オブジェクトを定義する。
//!
//! ## 不変条件
//!
//! - すべての習慣は既存のアカウントを参照する（所有者は作成時に固定）
//! - 更新操作で変更できるのはタイトルとステータスのみ
//!
//! ## ラベルについて
//!
//! 頻度（"Daily" など）とステータス（"Active" / "Completed" など）は
//! 列挙型ではなく自由入力のラベルとして扱う。クライアント側の表示語彙を
//! サーバーが制限しないための判断。

use chrono::{DateTime, NaiveDate, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{DomainError, account::AccountId};

/// 習慣 ID（一意識別子）
///
/// データベースの `BIGSERIAL` で採番される数値をラップする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct HabitId(i64);

impl HabitId {
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// 習慣のタイトル（値オブジェクト）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitTitle(String);

impl HabitTitle {
    /// タイトルを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない（前後の空白は除去）
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("タイトルは必須です".to_string()));
        }

        if value.chars().count() > 255 {
            return Err(DomainError::Validation(
                "タイトルは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 頻度ラベル（"Daily", "Weekly" など）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frequency(String);

impl Frequency {
    /// 頻度ラベルを作成する（空文字列は拒否、最大 50 文字）
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("頻度は必須です".to_string()));
        }

        if value.chars().count() > 50 {
            return Err(DomainError::Validation(
                "頻度は50文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ステータスラベル（"Active", "Completed" など）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitStatus(String);

impl HabitStatus {
    /// ステータスラベルを作成する（空文字列は拒否、最大 50 文字）
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("ステータスは必須です".to_string()));
        }

        if value.chars().count() > 50 {
            return Err(DomainError::Validation(
                "ステータスは50文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 習慣エンティティ
///
/// 1 つのアカウントに属するトラッキング対象の習慣を表現する。
/// 所有者（`account_id`）は作成時に固定され、以後変更されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    id:         HabitId,
    account_id: AccountId,
    title:      HabitTitle,
    start_date: NaiveDate,
    frequency:  Frequency,
    status:     HabitStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Habit {
    /// 既存のデータから習慣を復元する（データベースから取得時）
    pub fn from_db(
        id: HabitId,
        account_id: AccountId,
        title: HabitTitle,
        start_date: NaiveDate,
        frequency: Frequency,
        status: HabitStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            title,
            start_date,
            frequency,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> HabitId {
        self.id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn title(&self) -> &HabitTitle {
        &self.title
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    pub fn status(&self) -> &HabitStatus {
        &self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// タイトルとステータスを置き換えた新しいインスタンスを返す
    ///
    /// 開始日・頻度・所有者は変更されない。PUT /api/habits/{id} で使用する。
    pub fn with_title_and_status(
        self,
        title: HabitTitle,
        status: HabitStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title,
            status,
            updated_at: now,
            ..self
        }
    }
}

/// 未採番の習慣（作成時の書き込みデータ）
///
/// ID はデータベースが採番するため、INSERT 前はこの型で扱う。
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub account_id: AccountId,
    pub title:      HabitTitle,
    pub start_date: NaiveDate,
    pub frequency:  Frequency,
    pub status:     HabitStatus,
    pub created_at: DateTime<Utc>,
}
