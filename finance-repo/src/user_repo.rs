use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub type UserId = i32;

#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError>;
    async fn email_exists(&self, email: &str) -> Result<bool, UserRepoError>;
    /// Fails with [UserRepoError::UserAlreadyExists] if the email is taken, even if a prior
    /// [UserRepo::email_exists] check passed.
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError>;
}

#[derive(sqlx::FromRow, Clone, PartialEq, Debug)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(name: String, email: String, password_hash: String) -> NewUser {
        NewUser {
            name,
            email,
            password_hash,
        }
    }

    pub(crate) fn into_user(self, id: UserId, created_at: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at,
        }
    }
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("User {0} not found")]
    UserNotFound(UserId),
    #[error("No user with email {0}")]
    EmailNotFound(String),
    #[error("User with email {0} already exists")]
    UserAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
