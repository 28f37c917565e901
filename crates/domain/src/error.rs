//! # ドメイン層エラー定義
//!
//! ビジネスルール違反を表現するエラー型。
//!
//! 存在しないエンティティや一意制約の競合は永続化層でしか判定できないため、
//! ここでは扱わない（インフラ層・API 層のエラー型が担当する）。

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 必須フィールドの未入力、文字数制限の超過、不正なフォーマットなど。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
