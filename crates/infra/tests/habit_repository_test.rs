//! HabitRepository 統合テスト
//!
//! データベースを使用したテスト。sqlx::test マクロを使用して、
//! テストごとに独立したデータベースを作成・破棄する。
//!
//! 実行方法:
//! ```bash
//! DATABASE_URL=postgres://... cargo test -p habitflow-infra --test habit_repository_test
//! ```

mod common;

use common::{insert_account, new_habit, test_now, test_start_date};
use habitflow_domain::{
    account::AccountId,
    habit::{HabitId, HabitStatus, HabitTitle},
};
use habitflow_infra::{
    InfraErrorKind,
    repository::{HabitRepository, PostgresHabitRepository},
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_insertで採番済みの習慣が返る(pool: PgPool) {
    let owner = insert_account(&pool, "John Doe", "john@example.com").await;
    let repo = PostgresHabitRepository::new(pool);

    let habit = repo
        .insert(&new_habit(owner.id(), "Drink Water"))
        .await
        .unwrap();

    assert!(habit.id().as_i64() > 0);
    assert_eq!(habit.account_id(), owner.id());
    assert_eq!(habit.title().as_str(), "Drink Water");
    assert_eq!(habit.start_date(), test_start_date());
    assert_eq!(habit.frequency().as_str(), "Daily");
    assert_eq!(habit.status().as_str(), "Active");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないアカウントへのinsertはinvalid_inputになる(pool: PgPool) {
    let repo = PostgresHabitRepository::new(pool);

    let result = repo
        .insert(&new_habit(AccountId::from_i64(999), "Drink Water"))
        .await;

    let err = result.expect_err("外部キー違反になること");
    assert!(matches!(err.kind(), InfraErrorKind::InvalidInput(_)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_一覧は所有者の習慣だけをid順で返す(pool: PgPool) {
    let john = insert_account(&pool, "John Doe", "john@example.com").await;
    let jane = insert_account(&pool, "Jane Doe", "jane@example.com").await;
    let repo = PostgresHabitRepository::new(pool);

    repo.insert(&new_habit(john.id(), "Drink Water")).await.unwrap();
    repo.insert(&new_habit(jane.id(), "Run")).await.unwrap();
    repo.insert(&new_habit(john.id(), "Read")).await.unwrap();

    let habits = repo.list_by_account(john.id()).await.unwrap();

    assert_eq!(habits.len(), 2);
    assert!(habits.iter().all(|h| h.account_id() == john.id()));
    assert_eq!(habits[0].title().as_str(), "Drink Water");
    assert_eq!(habits[1].title().as_str(), "Read");

    // 他の所有者からは見えない
    let jane_habits = repo.list_by_account(jane.id()).await.unwrap();
    assert_eq!(jane_habits.len(), 1);
    assert_eq!(jane_habits[0].title().as_str(), "Run");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_習慣がなければ空の一覧が返る(pool: PgPool) {
    let owner = insert_account(&pool, "John Doe", "john@example.com").await;
    let repo = PostgresHabitRepository::new(pool);

    let habits = repo.list_by_account(owner.id()).await.unwrap();

    assert!(habits.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_updateはタイトルとステータスだけを置き換える(pool: PgPool) {
    let owner = insert_account(&pool, "John Doe", "john@example.com").await;
    let repo = PostgresHabitRepository::new(pool);
    let habit = repo
        .insert(&new_habit(owner.id(), "Drink Water"))
        .await
        .unwrap();

    let updated = habit.with_title_and_status(
        HabitTitle::new("Drink More Water").unwrap(),
        HabitStatus::new("Paused").unwrap(),
        test_now(),
    );
    repo.update(&updated).await.unwrap();

    let found = repo.find_by_id(updated.id()).await.unwrap().unwrap();
    assert_eq!(found.title().as_str(), "Drink More Water");
    assert_eq!(found.status().as_str(), "Paused");
    // 開始日・頻度・所有者は変わらない
    assert_eq!(found.start_date(), test_start_date());
    assert_eq!(found.frequency().as_str(), "Daily");
    assert_eq!(found.account_id(), owner.id());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_deleteは削除の有無をboolで返す(pool: PgPool) {
    let owner = insert_account(&pool, "John Doe", "john@example.com").await;
    let repo = PostgresHabitRepository::new(pool);
    let habit = repo
        .insert(&new_habit(owner.id(), "Drink Water"))
        .await
        .unwrap();

    assert!(repo.delete(habit.id()).await.unwrap());
    // 2 回目は行が存在しない
    assert!(!repo.delete(habit.id()).await.unwrap());
    assert!(repo.find_by_id(habit.id()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_存在しないidのdeleteはfalseを返す(pool: PgPool) {
    let repo = PostgresHabitRepository::new(pool);

    assert!(!repo.delete(HabitId::from_i64(999)).await.unwrap());
}

/// 登録 → 作成 → 一覧 → 削除 → 一覧の一連の流れ
#[sqlx::test(migrations = "../../migrations")]
async fn test_アカウント登録から習慣の作成一覧削除までの一連の流れ(pool: PgPool) {
    let owner = insert_account(&pool, "John Doe", "john@example.com").await;
    let repo = PostgresHabitRepository::new(pool);

    // 作成
    let habit = repo
        .insert(&new_habit(owner.id(), "Drink Water"))
        .await
        .unwrap();

    // 一覧にちょうど 1 件
    let habits = repo.list_by_account(owner.id()).await.unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].id(), habit.id());

    // 削除
    assert!(repo.delete(habit.id()).await.unwrap());

    // 一覧は空に戻る
    let habits = repo.list_by_account(owner.id()).await.unwrap();
    assert!(habits.is_empty());
}
