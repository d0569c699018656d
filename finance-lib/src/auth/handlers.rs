use crate::auth::jwt::JWTAuth;
use crate::auth::password;
use crate::error::HandlerError;
use crate::user::{UserId, UserProfile};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;
use finance_repo::user_repo::{NewUser, User, UserRepo, UserRepoError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), HandlerError> {
        if self.name.trim().is_empty() {
            return Err(HandlerError::Validation("Name is required.".to_string()));
        }
        if !is_well_formed_email(&self.email) {
            return Err(HandlerError::Validation(
                "A valid email address is required.".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(HandlerError::Validation("Password is required.".to_string()));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub name: String,
    pub email: String,
}

/// `local@domain` with no whitespace and a dot somewhere in the domain.
fn is_well_formed_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn issue_token(jwt_auth: &JWTAuth, user: &User) -> Result<AuthResponse, HandlerError> {
    let token = jwt_auth
        .create_token(user.id, &user.name, &user.email)
        .context("Unable to sign token")?;
    Ok(AuthResponse {
        token,
        name: user.name.clone(),
        email: user.email.clone(),
    })
}

#[post("/register")]
#[instrument(skip_all, fields(email = %request.email))]
pub async fn register(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    jwt_auth: web::Data<JWTAuth>,
    request: web::Json<RegisterRequest>,
) -> Result<impl Responder, HandlerError> {
    let request = request.into_inner();
    request.validate()?;

    // early exit only; create_user's unique index is what actually rejects duplicates
    if user_repo.email_exists(&request.email).await? {
        return Err(UserRepoError::UserAlreadyExists(request.email).into());
    }

    let password_hash =
        password::encode_password(&request.password).context("Unable to hash password")?;
    let user = user_repo
        .create_user(NewUser::new(request.name, request.email, password_hash))
        .await
        .map_err(|e| {
            if let UserRepoError::UserAlreadyExists(_) = e {
                warn!("email registered concurrently");
            }
            e
        })?;
    info!(user_id = user.id, "registered user");

    Ok(HttpResponse::Ok().json(issue_token(&jwt_auth, &user)?))
}

#[post("/login")]
#[instrument(skip_all, fields(email = %credentials.email))]
pub async fn login(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    jwt_auth: web::Data<JWTAuth>,
    credentials: web::Json<LoginRequest>,
) -> Result<impl Responder, HandlerError> {
    let credentials = credentials.into_inner();
    if credentials.email.trim().is_empty() || credentials.password.trim().is_empty() {
        return Err(HandlerError::Validation(
            "Email and password are required.".to_string(),
        ));
    }

    let user = match user_repo.get_user_by_email(&credentials.email).await {
        Ok(user) => user,
        Err(UserRepoError::EmailNotFound(_)) => {
            password::verify_dummy_password(&credentials.password);
            return Err(HandlerError::InvalidCredentials);
        }
        Err(e) => return Err(e.into()),
    };
    if !password::verify_password(&credentials.password, &user.password_hash) {
        return Err(HandlerError::InvalidCredentials);
    }

    Ok(HttpResponse::Ok().json(issue_token(&jwt_auth, &user)?))
}

pub async fn current_user(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    user_id: Option<web::ReqData<UserId>>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.ok_or(HandlerError::Unauthenticated)?.into_inner();
    let user = user_repo.get_user(user_id).await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}
