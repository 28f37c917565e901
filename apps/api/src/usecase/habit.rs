//! # 習慣ユースケース
//!
//! 習慣の作成・一覧取得・更新・削除を実装する。
//!
//! ## 設計方針
//!
//! - 作成時は所有者アカウントの存在を事前に確認し、存在しなければ
//!   400（不正な参照）。確認と INSERT の間のレースは外部キー制約が拾う
//! - 一覧は必ず所有者で絞り込む（全件取得の口は存在しない)
//! - 更新で変更できるのはタイトルとステータスのみ。
//!   開始日・頻度・所有者は作成時に固定される
//! - 削除は冪等。存在しない ID の削除も成功として返す

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use habitflow_domain::{
    account::AccountId,
    clock::Clock,
    habit::{Frequency, Habit, HabitId, HabitStatus, HabitTitle, NewHabit},
};
use habitflow_infra::repository::{AccountRepository, HabitRepository};

use crate::error::ApiError;

/// 習慣作成の入力
///
/// `start_date` が省略された場合は当日が設定される。
#[derive(Debug)]
pub struct CreateHabitInput {
    pub account_id: AccountId,
    pub title:      HabitTitle,
    pub start_date: Option<NaiveDate>,
    pub frequency:  Frequency,
    pub status:     HabitStatus,
}

/// 習慣更新の入力
#[derive(Debug)]
pub struct UpdateHabitInput {
    pub id:     HabitId,
    pub title:  HabitTitle,
    pub status: HabitStatus,
}

/// 習慣ユースケーストレイト
#[async_trait]
pub trait HabitUseCase: Send + Sync {
    /// 習慣を作成する
    ///
    /// 所有者アカウントが存在しない場合は `ApiError::BadRequest`。
    async fn create_habit(&self, input: CreateHabitInput) -> Result<Habit, ApiError>;

    /// アカウントが所有する習慣の一覧を取得する
    ///
    /// 習慣が 1 件もない場合は空の Vec。
    async fn list_habits(&self, account_id: AccountId) -> Result<Vec<Habit>, ApiError>;

    /// 習慣のタイトルとステータスを更新する
    ///
    /// 存在しない場合は `ApiError::NotFound`。
    async fn update_habit(&self, input: UpdateHabitInput) -> Result<Habit, ApiError>;

    /// 習慣を削除する（冪等）
    async fn delete_habit(&self, id: HabitId) -> Result<(), ApiError>;
}

/// 習慣ユースケースの実装
pub struct HabitUseCaseImpl {
    habit_repository:   Arc<dyn HabitRepository>,
    account_repository: Arc<dyn AccountRepository>,
    clock:              Arc<dyn Clock>,
}

impl HabitUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        habit_repository: Arc<dyn HabitRepository>,
        account_repository: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            habit_repository,
            account_repository,
            clock,
        }
    }
}

#[async_trait]
impl HabitUseCase for HabitUseCaseImpl {
    async fn create_habit(&self, input: CreateHabitInput) -> Result<Habit, ApiError> {
        // 所有者の存在確認。存在しない参照は保存エラーではなく
        // リクエスト不正として扱う
        if self
            .account_repository
            .find_by_id(input.account_id)
            .await?
            .is_none()
        {
            return Err(ApiError::BadRequest(format!(
                "参照先のアカウントが存在しません: {}",
                input.account_id
            )));
        }

        let now = self.clock.now();
        let draft = NewHabit {
            account_id: input.account_id,
            title:      input.title,
            start_date: input.start_date.unwrap_or_else(|| now.date_naive()),
            frequency:  input.frequency,
            status:     input.status,
            created_at: now,
        };

        let habit = self.habit_repository.insert(&draft).await?;
        tracing::info!(habit_id = %habit.id(), account_id = %habit.account_id(), "習慣を作成しました");

        Ok(habit)
    }

    async fn list_habits(&self, account_id: AccountId) -> Result<Vec<Habit>, ApiError> {
        Ok(self.habit_repository.list_by_account(account_id).await?)
    }

    async fn update_habit(&self, input: UpdateHabitInput) -> Result<Habit, ApiError> {
        let habit = self
            .habit_repository
            .find_by_id(input.id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("習慣が見つかりません: {}", input.id)))?;

        let updated = habit.with_title_and_status(input.title, input.status, self.clock.now());
        self.habit_repository.update(&updated).await?;
        tracing::info!(habit_id = %updated.id(), "習慣を更新しました");

        Ok(updated)
    }

    async fn delete_habit(&self, id: HabitId) -> Result<(), ApiError> {
        let deleted = self.habit_repository.delete(id).await?;
        if deleted {
            tracing::info!(habit_id = %id, "習慣を削除しました");
        } else {
            // 冪等な削除。存在しなくても成功として返す
            tracing::debug!(habit_id = %id, "削除対象の習慣は存在しませんでした");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use habitflow_domain::{
        account::{Account, AccountName, Email, NewAccount},
        clock::FixedClock,
        password::PasswordHash,
    };
    use habitflow_infra::InfraError;
    use pretty_assertions::assert_eq;

    use super::*;

    // テスト用スタブ

    struct StubHabitRepository {
        habits: Vec<Habit>,
    }

    impl StubHabitRepository {
        fn with_habits(habits: Vec<Habit>) -> Self {
            Self { habits }
        }

        fn empty() -> Self {
            Self { habits: Vec::new() }
        }
    }

    #[async_trait]
    impl HabitRepository for StubHabitRepository {
        async fn find_by_id(&self, id: HabitId) -> Result<Option<Habit>, InfraError> {
            Ok(self.habits.iter().find(|h| h.id() == id).cloned())
        }

        async fn list_by_account(
            &self,
            account_id: AccountId,
        ) -> Result<Vec<Habit>, InfraError> {
            Ok(self
                .habits
                .iter()
                .filter(|h| h.account_id() == account_id)
                .cloned()
                .collect())
        }

        async fn insert(&self, draft: &NewHabit) -> Result<Habit, InfraError> {
            Ok(Habit::from_db(
                HabitId::from_i64(10),
                draft.account_id,
                draft.title.clone(),
                draft.start_date,
                draft.frequency.clone(),
                draft.status.clone(),
                draft.created_at,
                draft.created_at,
            ))
        }

        async fn update(&self, _habit: &Habit) -> Result<(), InfraError> {
            Ok(())
        }

        async fn delete(&self, id: HabitId) -> Result<bool, InfraError> {
            Ok(self.habits.iter().any(|h| h.id() == id))
        }
    }

    struct StubAccountRepository {
        account: Option<Account>,
    }

    impl StubAccountRepository {
        fn with_account() -> Self {
            Self {
                account: Some(Account::from_db(
                    AccountId::from_i64(1),
                    AccountName::new("John Doe").unwrap(),
                    Email::new("john@example.com").unwrap(),
                    PasswordHash::new("stored_hash"),
                    fixed_now(),
                    fixed_now(),
                )),
            }
        }

        fn empty() -> Self {
            Self { account: None }
        }
    }

    #[async_trait]
    impl AccountRepository for StubAccountRepository {
        async fn find_by_id(&self, _id: AccountId) -> Result<Option<Account>, InfraError> {
            Ok(self.account.clone())
        }

        async fn find_by_email(&self, _email: &Email) -> Result<Option<Account>, InfraError> {
            Ok(self.account.clone())
        }

        async fn insert(&self, _draft: &NewAccount) -> Result<Account, InfraError> {
            unreachable!("このユースケースは insert を呼ばない")
        }

        async fn update(&self, _account: &Account) -> Result<(), InfraError> {
            Ok(())
        }
    }

    // --- ヘルパー ---

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn make_habit(id: i64, account_id: i64, title: &str) -> Habit {
        Habit::from_db(
            HabitId::from_i64(id),
            AccountId::from_i64(account_id),
            HabitTitle::new(title).unwrap(),
            NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
            Frequency::new("Daily").unwrap(),
            HabitStatus::new("Active").unwrap(),
            fixed_now(),
            fixed_now(),
        )
    }

    fn create_sut(
        habits: StubHabitRepository,
        accounts: StubAccountRepository,
    ) -> HabitUseCaseImpl {
        HabitUseCaseImpl::new(
            Arc::new(habits),
            Arc::new(accounts),
            Arc::new(FixedClock::new(fixed_now())),
        )
    }

    // --- テストケース ---

    #[tokio::test]
    async fn test_create_habit_成功() {
        // Given
        let sut = create_sut(
            StubHabitRepository::empty(),
            StubAccountRepository::with_account(),
        );
        let input = CreateHabitInput {
            account_id: AccountId::from_i64(1),
            title:      HabitTitle::new("Drink Water").unwrap(),
            start_date: Some(NaiveDate::from_ymd_opt(2023, 11, 1).unwrap()),
            frequency:  Frequency::new("Daily").unwrap(),
            status:     HabitStatus::new("Active").unwrap(),
        };

        // When
        let result = sut.create_habit(input).await;

        // Then
        let habit = result.unwrap();
        assert_eq!(habit.title().as_str(), "Drink Water");
        assert_eq!(habit.account_id(), AccountId::from_i64(1));
    }

    #[tokio::test]
    async fn test_create_habit_開始日省略時は当日になる() {
        // Given
        let sut = create_sut(
            StubHabitRepository::empty(),
            StubAccountRepository::with_account(),
        );
        let input = CreateHabitInput {
            account_id: AccountId::from_i64(1),
            title:      HabitTitle::new("Read").unwrap(),
            start_date: None,
            frequency:  Frequency::new("Daily").unwrap(),
            status:     HabitStatus::new("Active").unwrap(),
        };

        // When
        let habit = sut.create_habit(input).await.unwrap();

        // Then
        assert_eq!(habit.start_date(), fixed_now().date_naive());
    }

    #[tokio::test]
    async fn test_create_habit_存在しない所有者で400() {
        // Given
        let sut = create_sut(StubHabitRepository::empty(), StubAccountRepository::empty());
        let input = CreateHabitInput {
            account_id: AccountId::from_i64(999),
            title:      HabitTitle::new("Drink Water").unwrap(),
            start_date: None,
            frequency:  Frequency::new("Daily").unwrap(),
            status:     HabitStatus::new("Active").unwrap(),
        };

        // When
        let result = sut.create_habit(input).await;

        // Then
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_list_habits_所有者の習慣だけが返る() {
        // Given
        let habits = vec![
            make_habit(10, 1, "Drink Water"),
            make_habit(11, 2, "Run"),
            make_habit(12, 1, "Read"),
        ];
        let sut = create_sut(
            StubHabitRepository::with_habits(habits),
            StubAccountRepository::with_account(),
        );

        // When
        let result = sut.list_habits(AccountId::from_i64(1)).await.unwrap();

        // Then
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|h| h.account_id() == AccountId::from_i64(1)));
    }

    #[tokio::test]
    async fn test_list_habits_習慣がなければ空() {
        // Given
        let sut = create_sut(
            StubHabitRepository::empty(),
            StubAccountRepository::with_account(),
        );

        // When
        let result = sut.list_habits(AccountId::from_i64(1)).await.unwrap();

        // Then
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_update_habit_タイトルとステータスが置き換わる() {
        // Given
        let sut = create_sut(
            StubHabitRepository::with_habits(vec![make_habit(10, 1, "Drink Water")]),
            StubAccountRepository::with_account(),
        );
        let input = UpdateHabitInput {
            id:     HabitId::from_i64(10),
            title:  HabitTitle::new("Drink More Water").unwrap(),
            status: HabitStatus::new("Paused").unwrap(),
        };

        // When
        let updated = sut.update_habit(input).await.unwrap();

        // Then
        assert_eq!(updated.title().as_str(), "Drink More Water");
        assert_eq!(updated.status().as_str(), "Paused");
        // 開始日・頻度・所有者は変わらない
        assert_eq!(
            updated.start_date(),
            NaiveDate::from_ymd_opt(2023, 11, 1).unwrap()
        );
        assert_eq!(updated.frequency().as_str(), "Daily");
        assert_eq!(updated.account_id(), AccountId::from_i64(1));
    }

    #[tokio::test]
    async fn test_update_habit_存在しないidでnotfound() {
        // Given
        let sut = create_sut(StubHabitRepository::empty(), StubAccountRepository::empty());
        let input = UpdateHabitInput {
            id:     HabitId::from_i64(999),
            title:  HabitTitle::new("x").unwrap(),
            status: HabitStatus::new("Active").unwrap(),
        };

        // When
        let result = sut.update_habit(input).await;

        // Then
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_habit_成功() {
        // Given
        let sut = create_sut(
            StubHabitRepository::with_habits(vec![make_habit(10, 1, "Drink Water")]),
            StubAccountRepository::with_account(),
        );

        // When
        let result = sut.delete_habit(HabitId::from_i64(10)).await;

        // Then
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_habit_存在しないidでも成功する() {
        // Given
        let sut = create_sut(StubHabitRepository::empty(), StubAccountRepository::empty());

        // When
        let result = sut.delete_habit(HabitId::from_i64(999)).await;

        // Then
        assert!(result.is_ok());
    }
}
