//! # 認証ユースケース
//!
//! アカウント登録・ログイン・ログアウトを実装する。
//!
//! ## タイミング攻撃対策
//!
//! ログインでは、アカウントが存在しない場合もダミーハッシュで
//! 検証を実行し、処理時間を均一化する。

use std::sync::Arc;

use async_trait::async_trait;
use habitflow_domain::{
    account::{Account, AccountName, Email, NewAccount},
    clock::Clock,
    password::PlainPassword,
};
use habitflow_infra::{
    PasswordChecker,
    PasswordHasher,
    SessionData,
    SessionManager,
    repository::AccountRepository,
};

use crate::error::ApiError;

/// アカウント登録の入力
#[derive(Debug)]
pub struct RegisterInput {
    pub name:     AccountName,
    pub email:    Email,
    pub password: PlainPassword,
}

/// ログイン成功時の出力
#[derive(Debug)]
pub struct LoginOutput {
    /// 発行されたベアラートークン
    pub token:   String,
    /// ログインしたアカウント
    pub account: Account,
}

/// 認証ユースケーストレイト
#[async_trait]
pub trait AuthUseCase: Send + Sync {
    /// アカウントを登録する
    ///
    /// メールアドレスが既に使用されている場合は `ApiError::Conflict`。
    async fn register(&self, input: RegisterInput) -> Result<Account, ApiError>;

    /// メールアドレスとパスワードでログインし、トークンを発行する
    ///
    /// アカウントが存在しない場合もパスワード不一致の場合も、
    /// 同じ `ApiError::Unauthorized` を返す（存在の推測を防ぐ）。
    async fn login(&self, email: Email, password: PlainPassword)
    -> Result<LoginOutput, ApiError>;

    /// トークンに対応するセッションを破棄する
    ///
    /// セッションが存在しなくても成功とする（冪等）。
    async fn logout(&self, token: &str) -> Result<(), ApiError>;
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
    account_repository: Arc<dyn AccountRepository>,
    password_hasher:    Arc<dyn PasswordHasher>,
    password_checker:   Arc<dyn PasswordChecker>,
    session_manager:    Arc<dyn SessionManager>,
    clock:              Arc<dyn Clock>,
}

impl AuthUseCaseImpl {
    /// 新しいユースケースインスタンスを作成
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        password_checker: Arc<dyn PasswordChecker>,
        session_manager: Arc<dyn SessionManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            account_repository,
            password_hasher,
            password_checker,
            session_manager,
            clock,
        }
    }

    /// ダミーハッシュで検証を実行する（タイミング攻撃対策）
    ///
    /// アカウントが存在しない場合も実際のパスワード検証と同等の
    /// 時間を消費する。固定 sleep ではなく実際に Argon2id 検証を
    /// 実行することで、CPU/メモリ状況による自然な変動も含めて
    /// 同じ時間特性になる。
    fn dummy_verification(&self, password: &PlainPassword) {
        // ダミーハッシュ（有効な Argon2id 形式）
        let dummy_hash = habitflow_domain::password::PasswordHash::new(
            "$argon2id$v=19$m=65536,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        );
        // 結果は無視（エラーでも問題ない）
        let _ = self.password_checker.verify(password, &dummy_hash);
    }
}

#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
    async fn register(&self, input: RegisterInput) -> Result<Account, ApiError> {
        // 事前の重複チェック（同時登録のレースは INSERT 時の一意制約が拾う）
        if self
            .account_repository
            .find_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict(format!(
                "このメールアドレスは既に登録されています: {}",
                input.email
            )));
        }

        let password_hash = self.password_hasher.hash(&input.password)?;
        let draft = NewAccount::new(input.name, input.email, password_hash, self.clock.now());

        let account = self.account_repository.insert(&draft).await?;
        tracing::info!(account_id = %account.id(), "アカウントを登録しました");

        Ok(account)
    }

    async fn login(
        &self,
        email: Email,
        password: PlainPassword,
    ) -> Result<LoginOutput, ApiError> {
        let account = self.account_repository.find_by_email(&email).await?;

        let Some(account) = account else {
            // アカウントが見つからない
            // タイミング攻撃対策: ダミーハッシュで検証を実行
            self.dummy_verification(&password);
            return Err(ApiError::Unauthorized(
                "メールアドレスまたはパスワードが正しくありません".to_string(),
            ));
        };

        let result = self
            .password_checker
            .verify(&password, account.password_hash())?;
        if result.is_mismatch() {
            return Err(ApiError::Unauthorized(
                "メールアドレスまたはパスワードが正しくありません".to_string(),
            ));
        }

        let session = SessionData::new(
            account.id(),
            account.email().as_str().to_string(),
            account.name().as_str().to_string(),
            self.clock.now(),
        );
        let token = self.session_manager.create(&session).await?;
        tracing::info!(account_id = %account.id(), "ログインしました");

        Ok(LoginOutput { token, account })
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.session_manager.delete(token).await?;
        Ok(())
    }
}
