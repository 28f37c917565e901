//! # ユースケース
//!
//! API サーバーのビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - ユースケースはトレイトとして公開し、ハンドラはトレイトオブジェクト
//!   越しに呼び出す（ハンドラテストでスタブに差し替えるため）
//! - リポジトリ・ハッシュ化・セッション・時刻はすべてコンストラクタ注入

pub mod account;
pub mod auth;
pub mod habit;

pub use account::{AccountUseCase, AccountUseCaseImpl, UpdateAccountInput};
pub use auth::{AuthUseCase, AuthUseCaseImpl, LoginOutput, RegisterInput};
pub use habit::{CreateHabitInput, HabitUseCase, HabitUseCaseImpl, UpdateHabitInput};
