//! # HabitFlow 共有クレート
//!
//! API 層とテストコードの双方から使う、フレームワーク非依存の型を提供する。
//!
//! - [`api_response`] - 統一レスポンスエンベロープ `{ "data": T }`
//! - [`error_response`] - RFC 9457 Problem Details 形式のエラーレスポンス
//!
//! axum への依存はこのクレートには入れない。`IntoResponse` 変換は
//! API 層の責務とする。

pub mod api_response;
pub mod error_response;

pub use api_response::ApiResponse;
pub use error_response::ErrorResponse;
