use chrono::Utc;
use tracing::info;

use super::{JsonCollection, StoreError, Write};
use crate::models::user::User;

pub struct UserStore {
    users: JsonCollection<User>,
}

impl UserStore {
    pub fn new(users: JsonCollection<User>) -> Self {
        Self { users }
    }

    /// Seeds the demo employer account on first run.
    pub async fn init(&self) -> Result<(), StoreError> {
        self.users.ensure_exists(&[User::demo()]).await
    }

    #[cfg(test)]
    pub async fn find(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.load().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    /// Returns the account for `email`, creating it if unknown.
    pub async fn login(&self, email: &str) -> Result<User, StoreError> {
        self.users
            .transact(|users| {
                if let Some(existing) = users.iter().find(|u| u.email == email) {
                    return Write::Discard(existing.clone());
                }
                let user = User::new(email, None, Utc::now());
                info!("Auto-registered {email}");
                users.push(user.clone());
                Write::Commit(user)
            })
            .await
    }

    /// Creates an account. `None` when the email is already taken.
    pub async fn register(&self, email: &str, name: Option<&str>) -> Result<Option<User>, StoreError> {
        self.users
            .transact(|users| {
                if users.iter().any(|u| u.email == email) {
                    return Write::Discard(None);
                }
                let user = User::new(email, name, Utc::now());
                users.push(user.clone());
                Write::Commit(Some(user))
            })
            .await
    }
}
