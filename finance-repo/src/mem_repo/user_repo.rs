use crate::user_repo::UserRepoError::{EmailNotFound, UserAlreadyExists, UserNotFound};
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    users: HashMap<UserId, User>,
    ids_by_email: HashMap<String, UserId>,
    next_id: UserId,
}

pub struct MemUserRepo {
    state: RwLock<State>,
}

impl MemUserRepo {
    pub fn new() -> MemUserRepo {
        let state = State {
            users: HashMap::new(),
            ids_by_email: HashMap::new(),
            next_id: 1,
        };
        MemUserRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

#[async_trait]
impl UserRepo for MemUserRepo {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .get(&user_id)
            .cloned()
            .ok_or(UserNotFound(user_id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        let Some(user_id) = read_guard.ids_by_email.get(email) else {
            return Err(EmailNotFound(email.to_owned()));
        };
        let user = read_guard
            .users
            .get(user_id)
            .expect("users should contain every id in ids_by_email")
            .clone();
        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserRepoError> {
        let read_guard = self.read_lock()?;
        Ok(read_guard.ids_by_email.contains_key(email))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        let mut write_guard = self.write_lock()?;
        let id = write_guard.next_id;

        match write_guard.ids_by_email.entry(new_user.email.clone()) {
            Entry::Occupied(_) => return Err(UserAlreadyExists(new_user.email)),
            Entry::Vacant(e) => {
                e.insert(id);
            }
        }
        write_guard.next_id += 1;

        let user = new_user.into_user(id, Utc::now());
        write_guard.users.insert(id, user.clone());
        Ok(user)
    }
}
