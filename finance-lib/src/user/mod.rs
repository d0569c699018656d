use chrono::{DateTime, Utc};
use finance_repo::user_repo::User;
use serde::{Deserialize, Serialize};

pub use finance_repo::user_repo::UserId;

/// The public part of a [User]; never carries the password hash.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
