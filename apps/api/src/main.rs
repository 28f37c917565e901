//! # HabitFlow API サーバー
//!
//! 習慣トラッキングのバックエンド API サーバー。
//!
//! ## 役割
//!
//! - **アカウント管理**: 登録・認証・取得・更新
//! - **習慣管理**: 作成・一覧取得・更新・削除
//! - **アクセス制御**: 登録とログイン以外はベアラートークン必須
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `API_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `REDIS_URL` | **Yes** | Redis 接続 URL（セッションストア） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,habitflow=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! API_PORT=13000 DATABASE_URL=postgres://... REDIS_URL=redis://... \
//!     cargo run -p habitflow-api
//! ```

mod config;
mod error;
mod handler;
mod middleware;
mod usecase;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post, put},
};
use config::ApiConfig;
use habitflow_domain::clock::{Clock, SystemClock};
use habitflow_infra::{
    Argon2PasswordHasher,
    PasswordChecker,
    PasswordHasher,
    RedisSessionManager,
    SessionManager,
    db,
    repository::{
        AccountRepository,
        HabitRepository,
        PostgresAccountRepository,
        PostgresHabitRepository,
    },
};
use handler::{
    AccountState,
    AuthState,
    HabitState,
    create_habit,
    delete_habit,
    get_account,
    health_check,
    list_habits,
    login,
    logout,
    register,
    update_account,
    update_habit,
};
use middleware::{AuthnState, require_session};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use usecase::{AccountUseCaseImpl, AuthUseCaseImpl, HabitUseCaseImpl};

/// トレーシングを初期化する
///
/// `ErrorLayer` を組み込むことで、インフラ層のエラーが発生地点の
/// SpanTrace を捕捉できるようになる。
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,habitflow=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_error::ErrorLayer::default())
        .init();
}

/// API サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing();

    // 設定読み込み
    let config = ApiConfig::from_env().expect("設定の読み込みに失敗しました");

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データベース接続プールを作成
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("データベース接続に失敗しました");
    tracing::info!("データベースに接続しました");

    // マイグレーション実行
    db::run_migrations(&pool)
        .await
        .expect("マイグレーションの実行に失敗しました");
    tracing::info!("マイグレーションを適用しました");

    // セッションストア（Redis）に接続
    let session_manager: Arc<dyn SessionManager> = Arc::new(
        RedisSessionManager::connect(&config.redis_url)
            .await
            .expect("Redis 接続に失敗しました"),
    );
    tracing::info!("セッションストアに接続しました");

    // 依存コンポーネントを初期化
    let account_repo: Arc<dyn AccountRepository> =
        Arc::new(PostgresAccountRepository::new(pool.clone()));
    let habit_repo: Arc<dyn HabitRepository> = Arc::new(PostgresHabitRepository::new(pool));
    let argon2 = Arc::new(Argon2PasswordHasher::new());
    let password_hasher: Arc<dyn PasswordHasher> = argon2.clone();
    let password_checker: Arc<dyn PasswordChecker> = argon2;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let auth_state = Arc::new(AuthState {
        usecase: Arc::new(AuthUseCaseImpl::new(
            account_repo.clone(),
            password_hasher,
            password_checker,
            session_manager.clone(),
            clock.clone(),
        )),
    });
    let account_state = Arc::new(AccountState {
        usecase: Arc::new(AccountUseCaseImpl::new(account_repo.clone(), clock.clone())),
    });
    let habit_state = Arc::new(HabitState {
        usecase: Arc::new(HabitUseCaseImpl::new(habit_repo, account_repo, clock)),
    });
    let authn_state = AuthnState { session_manager };

    // ルーター構築
    //
    // 登録とログインは認証不要。それ以外の /api 配下は
    // require_session ミドルウェアを通す。
    let public_routes = Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .with_state(auth_state.clone());

    let protected_routes = Router::new()
        .route("/api/logout", post(logout))
        .with_state(auth_state)
        .route("/api/user", get(get_account).put(update_account))
        .with_state(account_state)
        .route("/api/habits", post(create_habit).get(list_habits))
        .route(
            "/api/habits/{id}",
            put(update_habit).delete(delete_habit),
        )
        .with_state(habit_state)
        .layer(axum::middleware::from_fn_with_state(
            authn_state,
            require_session,
        ));

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("アドレスのパースに失敗しました");

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
