
use std::sync::Arc;

use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use finance_repo::transaction_repo::TransactionRepo;
use finance_repo::user_repo::UserRepo;
use ::tracing::error;

use auth::jwt::JWTAuth;

pub mod auth;
pub mod config;
mod error;
pub mod path;
pub mod tracing;
pub mod transaction;
pub mod user;

/// Registers the repos, the token service and every route on an app.
///
/// `/transactions` and `/auth/me` sit behind the bearer middleware. `/auth/register` is only
/// mounted when `signups_enabled` is set.
pub fn app_config_func(
    jwt_auth: JWTAuth,
    user_repo: Arc<dyn UserRepo>,
    transaction_repo: Arc<dyn TransactionRepo>,
    signups_enabled: bool,
) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        let bearer_auth_middleware = HttpAuthentication::bearer(auth::credentials_validator);
        cfg.app_data(web::Data::new(jwt_auth.clone()))
            .app_data(web::Data::new(user_repo.clone()))
            .app_data(web::Data::new(transaction_repo.clone()))
            .app_data(json_config())
            .service(transaction::transaction_service().wrap(bearer_auth_middleware))
            .service(auth::auth_service(signups_enabled));
    }
}

/// Malformed JSON bodies get a 400 with the deserializer's complaint instead of actix's default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        error!(req_path = req.path(), %err);
        match err {
            JsonPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse JSON payload",
                    "detail": format!("{}", deserialize_err),
                });
                actix_web::error::InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest()
                        .content_type("application/json")
                        .body(error_body.to_string()),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}
