use async_trait::async_trait;

use super::users_model::{AppUser, NewAppUser};
use crate::errors::Result;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str) -> Result<AppUser>;
    fn find_by_email(&self, email: &str) -> Result<Option<AppUser>>;
    async fn create(&self, new_user: NewAppUser) -> Result<AppUser>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Registers a regular user. Emails are unique, case-insensitively.
    async fn register(&self, new_user: NewAppUser) -> Result<AppUser>;
    fn get_user(&self, user_id: &str) -> Result<AppUser>;
    fn find_by_email(&self, email: &str) -> Result<Option<AppUser>>;
    /// Creates the admin account if no user with that email exists yet.
    async fn ensure_admin(&self, email: &str, password_hash: String) -> Result<AppUser>;
}
