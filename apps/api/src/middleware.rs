//! # ミドルウェア
//!
//! API サーバー共通のミドルウェアを提供する。

pub mod auth;

pub use auth::{AuthnState, bearer_token, require_session};
