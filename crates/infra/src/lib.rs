//! # HabitFlow インフラ層
//!
//! 永続化と外部サービスへのアクセスを担当する。
//!
//! - [`db`] - PostgreSQL 接続プールの作成とマイグレーション
//! - [`repository`] - エンティティごとのリポジトリ（trait + PostgreSQL 実装)
//! - [`password`] - Argon2id によるパスワードハッシュ化・検証
//! - [`session`] - Redis によるベアラートークンのセッション管理
//! - [`error`] - インフラ層エラー（SpanTrace 付き）
//!
//! ユースケース層はリポジトリ trait のみに依存し、PostgreSQL / Redis の
//! 具体実装はアプリケーション起動時に注入される。

pub mod db;
pub mod error;
pub mod password;
pub mod repository;
pub mod session;

pub use error::{InfraError, InfraErrorKind};
pub use password::{Argon2PasswordHasher, PasswordChecker, PasswordHasher};
pub use session::{RedisSessionManager, SessionData, SessionManager};
