#![allow(dead_code, unused_macros)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use finance_lib::auth::jwt::JWTAuth;
use finance_lib::config::JwtConfig;
use finance_lib::user::UserId;
use finance_repo::transaction_repo::{NewTransaction, TransactionRepo, TransactionType};
use finance_repo::user_repo::{NewUser, UserRepo};
use rstest::*;
use rust_decimal::Decimal;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

pub mod mock;

/// Transaction routes only, authenticated as `$user_id` by [mock::MockAuthentication].
macro_rules! build_app {
    ($transaction_repo:expr, $user_id:expr) => {{
        let app = App::new()
            .app_data(Data::new($transaction_repo))
            .app_data(finance_lib::json_config())
            .wrap(finance_lib::tracing::create_middleware())
            .service(
                finance_lib::transaction::transaction_service()
                    .wrap(MockAuthentication { user_id: $user_id }),
            );
        tracing::info!("Built app");
        app
    }};
}

/// Every route, with real tokens, as the server mounts them.
macro_rules! build_full_app {
    ($signups_enabled:expr) => {{
        let (user_repo, transaction_repo) = finance_repo::mem_repo::create_repos();
        App::new()
            .wrap(finance_lib::tracing::create_middleware())
            .wrap(finance_lib::path::LowercasePath)
            .configure(finance_lib::app_config_func(
                utils::jwt_auth(),
                user_repo,
                transaction_repo,
                $signups_enabled,
            ))
    }};
}

macro_rules! create_transaction {
    (&$service:ident, $new_transaction:expr) => {{
        let request = TestRequest::post()
            .uri("/transactions")
            .set_json(&$new_transaction)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert!(
            response.status().is_success(),
            "Got {} response when creating transaction",
            response.status()
        );
        test::read_body_json(response).await
    }};
}

pub struct TestUser {
    pub user_id: UserId,
    pub email: String,
}

impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let email = format!("test-user-{}@example.com", Uuid::new_v4());
        let user = user_repo
            .create_user(NewUser::new(
                "Test User".to_string(),
                email.clone(),
                finance_lib::auth::password::encode_password("pass").unwrap(),
            ))
            .await
            .unwrap();
        info!(user_id = user.id, "Created user");
        TestUser {
            user_id: user.id,
            email,
        }
    }
}

pub fn jwt_auth() -> JWTAuth {
    JWTAuth::from_config(&JwtConfig {
        secret: "integration-test-secret".to_string(),
        issuer: "finance-test".to_string(),
        audience: "finance-web".to_string(),
        token_ttl_days: 1,
    })
}

pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn new_transaction(
    title: &str,
    amount: &str,
    transaction_type: TransactionType,
    date: DateTime<Utc>,
) -> NewTransaction {
    NewTransaction::new(
        amount.parse::<Decimal>().unwrap(),
        title.to_string(),
        date,
        "Card".to_string(),
        "Misc".to_string(),
        transaction_type,
    )
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn repos(
    #[from(tracing_setup)] _tracing: &(),
) -> (Arc<dyn UserRepo>, Arc<dyn TransactionRepo>) {
    finance_repo::mem_repo::create_repos()
}
