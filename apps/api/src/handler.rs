//! # ハンドラ
//!
//! HTTP リクエストの受け取りとレスポンスの組み立てを担当する。
//!
//! ## 設計方針
//!
//! - ハンドラはリクエストのデシリアライズ・値オブジェクトへの変換・
//!   ユースケース呼び出し・レスポンスの組み立てのみを行う
//! - ビジネスロジックはユースケース層に置く
//! - 成功レスポンスは [`ApiResponse`](habitflow_shared::ApiResponse) で包む

pub mod account;
pub mod auth;
pub mod habit;
pub mod health;

pub use account::{AccountState, get_account, update_account};
pub use auth::{AuthState, login, logout, register};
pub use habit::{HabitState, create_habit, delete_habit, list_habits, update_habit};
pub use health::health_check;
