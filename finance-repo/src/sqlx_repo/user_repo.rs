use crate::sqlx_repo::SQLxRepo;
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{query_as, query_scalar};
use tracing::instrument;

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

#[async_trait]
impl UserRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let user: Option<User> =
            query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to get user {}", user_id))?;
        user.ok_or(UserRepoError::UserNotFound(user_id))
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError> {
        let user: Option<User> =
            query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .context("Unable to get user by email")?;
        user.ok_or_else(|| UserRepoError::EmailNotFound(email.to_owned()))
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> Result<bool, UserRepoError> {
        let exists: bool = query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .context("Unable to check for existing email")?;
        Ok(exists)
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        // the unique index on email decides, not any earlier existence check
        let user: Option<User> = query_as(&format!(
            "INSERT INTO users(name, email, password_hash) VALUES($1, $2, $3) ON CONFLICT (email) DO NOTHING RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_optional(&self.pool)
        .await
        .context("Unable to create user")?;
        user.ok_or(UserRepoError::UserAlreadyExists(new_user.email))
    }
}
