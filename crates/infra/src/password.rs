//! # パスワードハッシュ化・検証
//!
//! Argon2id によるパスワードのハッシュ化と検証を提供する。
//!
//! 登録時は [`PasswordHasher`] でハッシュ化してから永続化し、
//! ログイン時は [`PasswordChecker`] で保存済みハッシュと照合する。
//! 平文パスワードがインフラ層より先に進むことはない。

use argon2::{
    Argon2,
    Params,
    PasswordVerifier as _,
    password_hash::{
        PasswordHash as Argon2PasswordHash,
        PasswordHasher as _,
        SaltString,
        rand_core::OsRng,
    },
};
use habitflow_domain::password::{PasswordHash, PasswordVerifyResult, PlainPassword};

use crate::InfraError;

/// パスワードハッシュ化を担当するトレイト
pub trait PasswordHasher: Send + Sync {
    /// 平文パスワードをソルト付きでハッシュ化する
    ///
    /// # Errors
    ///
    /// ハッシュ計算に失敗した場合
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;
}

/// パスワード検証を担当するトレイト
pub trait PasswordChecker: Send + Sync {
    /// パスワードを保存済みハッシュと照合する
    ///
    /// # Errors
    ///
    /// 保存されているハッシュの形式が不正な場合
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError>;
}

/// Argon2id によるハッシュ化・検証の実装
///
/// OWASP 推奨パラメータ（RFC 9106）を使用:
/// - Memory: 64 MB
/// - Iterations: 1
/// - Parallelism: 1
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        let params = Params::new(
            65536, // memory (KB) = 64 MB
            1,     // iterations
            1,     // parallelism
            None,  // output length (default: 32)
        )
        .expect("Argon2 パラメータが不正です");

        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::unexpected(format!("ハッシュ化に失敗しました: {e}")))?;

        Ok(PasswordHash::new(hash.to_string()))
    }
}

impl PasswordChecker for Argon2PasswordHasher {
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<PasswordVerifyResult, InfraError> {
        let parsed = Argon2PasswordHash::new(hash.as_str())
            .map_err(|e| InfraError::unexpected(format!("不正なハッシュ形式: {e}")))?;

        let matched = self
            .argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok();

        Ok(PasswordVerifyResult::from(matched))
    }
}
