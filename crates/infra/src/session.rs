//! # セッション管理
//!
//! Redis を使用したベアラートークンのセッション管理を提供する。
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `session:{token}` | SessionData (JSON) | 28800秒（8時間） |
//!
//! トークンはログイン成功時に発行され、以後のリクエストは
//! `Authorization: Bearer {token}` ヘッダで提示する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use habitflow_domain::account::AccountId;
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::InfraError;

/// セッションの有効期限（秒）
/// 8時間 = 28800秒
const SESSION_TTL_SECONDS: u64 = 28800;

/// セッションデータ
///
/// Redis に JSON 形式で保存されるセッション情報。
/// ログイン成功時に作成され、ログアウトまたは TTL 経過で削除される。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    account_id: AccountId,
    email:      String,
    name:       String,
    created_at: DateTime<Utc>,
}

impl SessionData {
    /// 新しいセッションデータを作成する
    pub fn new(account_id: AccountId, email: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            account_id,
            email,
            name,
            created_at: now,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// セッション管理トレイト
///
/// セッションの作成・取得・削除を行う。
/// 実装は Redis を使用する [`RedisSessionManager`] を参照。
#[async_trait]
pub trait SessionManager: Send + Sync {
    /// セッションを作成し、ベアラートークンを返す
    async fn create(&self, data: &SessionData) -> Result<String, InfraError>;

    /// トークンに対応するセッションを取得する
    ///
    /// セッションが存在すれば `Some(SessionData)`、なければ `None`。
    async fn get(&self, token: &str) -> Result<Option<SessionData>, InfraError>;

    /// セッションを削除する
    ///
    /// 存在しないセッションを削除しても成功とする。
    async fn delete(&self, token: &str) -> Result<(), InfraError>;
}

/// Redis を使用したセッションマネージャ
pub struct RedisSessionManager {
    conn: ConnectionManager,
}

impl RedisSessionManager {
    /// Redis に接続してセッションマネージャを作成する
    pub async fn connect(redis_url: &str) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    fn key(token: &str) -> String {
        format!("session:{token}")
    }
}

#[async_trait]
impl SessionManager for RedisSessionManager {
    async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
        let token = Uuid::new_v4().simple().to_string();
        let json = serde_json::to_string(data)?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(&token), json, SESSION_TTL_SECONDS)
            .await?;

        Ok(token)
    }

    async fn get(&self, token: &str) -> Result<Option<SessionData>, InfraError> {
        let mut conn = self.conn.clone();
        let json: Option<String> = conn.get(Self::key(token)).await?;

        let Some(json) = json else {
            return Ok(None);
        };

        let data: SessionData = serde_json::from_str(&json)?;
        Ok(Some(data))
    }

    async fn delete(&self, token: &str) -> Result<(), InfraError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(token)).await?;
        Ok(())
    }
}
