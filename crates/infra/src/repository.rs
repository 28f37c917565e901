//! # リポジトリ
//!
//! エンティティごとの永続化操作を trait として定義し、
//! PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **明示的なインターフェース**: エンティティごとに取得・保存・削除を
//!   trait で列挙する（フレームワークによる汎用 save/find は使わない）
//! - **エラーの分類**: 一意制約違反・外部キー違反はドライバのエラーコード
//!   から [`InfraError`](crate::InfraError) の専用種別に変換する

pub mod account_repository;
pub mod habit_repository;

pub use account_repository::{AccountRepository, PostgresAccountRepository};
pub use habit_repository::{HabitRepository, PostgresHabitRepository};
