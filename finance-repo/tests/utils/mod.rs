use finance_repo::transaction_repo::TransactionRepo;
use finance_repo::user_repo::{NewUser, User, UserRepo};
use std::env;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub mod generator;

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

/// Returns `None` for backends that are not available in this environment. The Postgres backend
/// needs `TEST_DATABASE_URL`.
pub async fn build_repos(
    repo_type: RepoType,
) -> Option<(Arc<dyn UserRepo>, Arc<dyn TransactionRepo>)> {
    match repo_type {
        RepoType::SQLx => {
            let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
                info!("TEST_DATABASE_URL not set, skipping");
                return None;
            };
            let repos = finance_repo::sqlx_repo::create_repos(&database_url, 1)
                .await
                .unwrap();
            Some(repos)
        }
        RepoType::Mem => Some(finance_repo::mem_repo::create_repos()),
    }
}

pub fn unique_email() -> String {
    format!("test-user-{}@example.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub async fn create_test_user(user_repo: &Arc<dyn UserRepo>) -> User {
    let new_user = NewUser::new(
        "Test User".to_owned(),
        unique_email(),
        "not a real hash".to_owned(),
    );
    let user = user_repo.create_user(new_user).await.unwrap();
    info!(user_id = user.id, "Created user");
    user
}
