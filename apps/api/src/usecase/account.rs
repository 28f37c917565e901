//! # アカウントユースケース
//!
//! アカウントの取得と更新を実装する。
//!
//! ## 設計方針
//!
//! - 更新は表示名とメールアドレスの全置換のみ。パスワードは
//!   この操作では変更できない（認証ユースケースの管轄）
//! - メールアドレスの変更先が他アカウントで使用中の場合は競合

use std::sync::Arc;

use async_trait::async_trait;
use habitflow_domain::{
    account::{Account, AccountId, AccountName, Email},
    clock::Clock,
};
use habitflow_infra::repository::AccountRepository;

use crate::error::ApiError;

/// アカウント更新の入力
#[derive(Debug)]
pub struct UpdateAccountInput {
    pub id:    AccountId,
    pub name:  AccountName,
    pub email: Email,
}

/// アカウントユースケーストレイト
#[async_trait]
pub trait AccountUseCase: Send + Sync {
    /// ID でアカウントを取得する
    ///
    /// 存在しない場合は `ApiError::NotFound`。
    async fn get_account(&self, id: AccountId) -> Result<Account, ApiError>;

    /// アカウントの表示名とメールアドレスを置き換える
    ///
    /// パスワードハッシュと作成日時は変更されない。
    async fn update_account(&self, input: UpdateAccountInput) -> Result<Account, ApiError>;
}

/// アカウントユースケースの実装
pub struct AccountUseCaseImpl {
    account_repository: Arc<dyn AccountRepository>,
    clock:              Arc<dyn Clock>,
}

impl AccountUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(account_repository: Arc<dyn AccountRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            account_repository,
            clock,
        }
    }
}

#[async_trait]
impl AccountUseCase for AccountUseCaseImpl {
    async fn get_account(&self, id: AccountId) -> Result<Account, ApiError> {
        self.account_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("アカウントが見つかりません: {id}")))
    }

    async fn update_account(&self, input: UpdateAccountInput) -> Result<Account, ApiError> {
        let account = self
            .account_repository
            .find_by_id(input.id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("アカウントが見つかりません: {}", input.id))
            })?;

        // 変更先のメールアドレスが他のアカウントで使用中なら競合
        // （同時更新のレースは UPDATE 時の一意制約が拾う）
        if input.email != *account.email() {
            if let Some(other) = self.account_repository.find_by_email(&input.email).await? {
                if other.id() != input.id {
                    return Err(ApiError::Conflict(format!(
                        "このメールアドレスは既に登録されています: {}",
                        input.email
                    )));
                }
            }
        }

        let updated = account.with_profile(input.name, input.email, self.clock.now());
        self.account_repository.update(&updated).await?;
        tracing::info!(account_id = %updated.id(), "アカウントを更新しました");

        Ok(updated)
    }
}
