//! # アカウント
//!
//! 登録ユーザーを表すエンティティと関連する値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: [`AccountId`] は DB 採番の数値 ID をラップし、
//!   Habit の ID との取り違えをコンパイルエラーにする
//! - **不変性**: エンティティの変更は `with_*` メソッド経由で新インスタンスを返す
//! - **バリデーション**: 値オブジェクトの生成時に検証ロジックを実行
//!
//! ## 不変条件
//!
//! - `email` はシステム全体で一意（書き込み時に検査、違反は競合エラー）
//! - `password_hash` は常にハッシュ済みの値（平文は保持しない）

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{DomainError, password::PasswordHash};

/// アカウント ID（一意識別子）
///
/// データベースの `BIGSERIAL` で採番される数値をラップする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct AccountId(i64);

impl AccountId {
    /// 既存の数値からアカウント ID を作成する
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// 内部の数値を取得する
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

/// メールアドレス（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式である
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 表示名（値オブジェクト）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountName(String);

impl AccountName {
    /// 表示名を作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない（前後の空白は除去）
    /// - 最大 100 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("表示名は必須です".to_string()));
        }

        if value.chars().count() > 100 {
            return Err(DomainError::Validation(
                "表示名は100文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// アカウントエンティティ
///
/// 登録済みユーザーを表現する。認証情報（パスワードハッシュ）も
/// このエンティティが保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id:            AccountId,
    name:          AccountName,
    email:         Email,
    password_hash: PasswordHash,
    created_at:    DateTime<Utc>,
    updated_at:    DateTime<Utc>,
}

impl Account {
    /// 既存のデータからアカウントを復元する（データベースから取得時）
    pub fn from_db(
        id: AccountId,
        name: AccountName,
        email: Email,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &AccountName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 表示名とメールアドレスを置き換えた新しいインスタンスを返す
    ///
    /// PUT /api/user の全置換セマンティクスに対応する。
    /// パスワードハッシュはこの操作では変更されない。
    pub fn with_profile(self, name: AccountName, email: Email, now: DateTime<Utc>) -> Self {
        Self {
            name,
            email,
            updated_at: now,
            ..self
        }
    }
}

/// 未採番のアカウント（登録時の書き込みデータ）
///
/// ID はデータベースが採番するため、INSERT 前はこの型で扱う。
/// リポジトリが INSERT 後に採番済みの [`Account`] を返す。
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name:          AccountName,
    pub email:         Email,
    pub password_hash: PasswordHash,
    pub created_at:    DateTime<Utc>,
}

impl NewAccount {
    pub fn new(
        name: AccountName,
        email: Email,
        password_hash: PasswordHash,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            email,
            password_hash,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[fixture]
    fn account(now: DateTime<Utc>) -> Account {
        Account::from_db(
            AccountId::from_i64(1),
            AccountName::new("John Doe").unwrap(),
            Email::new("john@example.com").unwrap(),
            PasswordHash::new("$argon2id$v=19$..."),
            now,
            now,
        )
    }

    // Email のテスト

    #[test]
    fn test_メールアドレスは正常な形式を受け入れる() {
        assert!(Email::new("user@example.com").is_ok());
    }

    #[test]
    fn test_メールアドレスはそのままの文字列で表示される() {
        let email = Email::new("user@example.com").unwrap();
        assert_eq!(format!("{email}"), "user@example.com");
    }

    #[rstest]
    #[case("", "空文字列")]
    #[case("no-at-sign", "@記号なし")]
    #[case("@example.com", "ローカル部分が空")]
    #[case("user@", "ドメイン部分が空")]
    #[case(&format!("{}@example.com", "a".repeat(256)), "255文字超過")]
    fn test_メールアドレスは不正な形式を拒否する(
        #[case] input: &str,
        #[case] _reason: &str,
    ) {
        assert!(Email::new(input).is_err());
    }

    // AccountName のテスト

    #[rstest]
    #[case("", "空文字列")]
    #[case("   ", "空白のみ")]
    #[case(&"あ".repeat(101), "100文字超過")]
    fn test_表示名は不正な値を拒否する(#[case] input: &str, #[case] _reason: &str) {
        assert!(AccountName::new(input).is_err());
    }

    #[test]
    fn test_表示名は前後の空白を除去する() {
        let name = AccountName::new("  John  ").unwrap();
        assert_eq!(name.as_str(), "John");
    }

    // Account のテスト

    #[rstest]
    fn test_プロフィール更新後の状態(account: Account) {
        let transition_time = DateTime::from_timestamp(1_700_001_000, 0).unwrap();
        let original = account.clone();
        let new_name = AccountName::new("Jane Doe").unwrap();
        let new_email = Email::new("jane@example.com").unwrap();

        let sut = account.with_profile(new_name.clone(), new_email.clone(), transition_time);

        let expected = Account::from_db(
            original.id(),
            new_name,
            new_email,
            original.password_hash().clone(),
            original.created_at(),
            transition_time,
        );
        assert_eq!(sut, expected);
    }

    #[rstest]
    fn test_プロフィール更新はパスワードハッシュを変更しない(account: Account) {
        let transition_time = DateTime::from_timestamp(1_700_001_000, 0).unwrap();
        let original_hash = account.password_hash().clone();

        let updated = account.with_profile(
            AccountName::new("Jane").unwrap(),
            Email::new("jane@example.com").unwrap(),
            transition_time,
        );

        assert_eq!(updated.password_hash(), &original_hash);
    }
}
