//! # HabitFlow ドメイン層
//!
//! 習慣トラッキングのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（[`account::Account`],
//!   [`habit::Habit`]）
//! - **値オブジェクト**: 生成時にバリデーションを実行する不変オブジェクト
//!   （[`account::Email`], [`habit::HabitTitle`] など）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、Redis）に一切依存しない。

pub mod account;
pub mod clock;
pub mod error;
pub mod habit;
pub mod password;

pub use error::DomainError;
