use crate::user::UserId;
use actix_web::dev::ServiceRequest;
use actix_web::error::ErrorInternalServerError;
use actix_web::{web, Error, HttpMessage, Scope};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use actix_web_httpauth::extractors::{bearer, AuthenticationError};
use actix_web_httpauth::headers::www_authenticate::bearer::Bearer;
use actix_web_httpauth::middleware::HttpAuthentication;
use jwt::JWTAuth;
use tracing::{debug, error};
use tracing_actix_web::RootSpan;

pub mod handlers;
pub mod jwt;
pub mod password;

/// Validates credentials using [JWTAuth]. If valid, injects the user id into request and into the
/// [RootSpan]
pub async fn credentials_validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(jwt_auth) = req.app_data::<web::Data<JWTAuth>>() else {
        error!("JWTAuth missing from app data");
        return Err((ErrorInternalServerError("authentication unavailable"), req));
    };
    match jwt_auth.validate_token(credentials.token()) {
        Ok(user) => {
            if let Some(root_span) = req.extensions().get::<RootSpan>() {
                root_span.record("user_id", user);
            }
            req.extensions_mut().insert::<UserId>(user);
            Ok(req)
        }
        Err(e) => {
            debug!(error = %e, "rejected bearer token");
            let challenge = Bearer::build().error(bearer::Error::InvalidToken).finish();
            Err((AuthenticationError::new(challenge).into(), req))
        }
    }
}

pub fn auth_service(signups_enabled: bool) -> Scope {
    let mut scope = web::scope("/auth").service(handlers::login).service(
        web::resource("/me")
            .wrap(HttpAuthentication::bearer(credentials_validator))
            .route(web::get().to(handlers::current_user)),
    );
    if signups_enabled {
        scope = scope.service(handlers::register);
    }
    scope
}
