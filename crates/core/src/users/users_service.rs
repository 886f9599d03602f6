use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::users_model::{normalize_email, AppUser, NewAppUser, UserRole};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, Result};

/// Service for managing user accounts
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, mut new_user: NewAppUser) -> Result<AppUser> {
        new_user.email = normalize_email(&new_user.email);
        new_user.business_no = new_user.business_no.trim().to_string();
        new_user.company_name = new_user.company_name.trim().to_string();
        new_user.role = UserRole::User;
        new_user.validate()?;

        if self.repository.find_by_email(&new_user.email)?.is_some() {
            return Err(Error::invalid_input("Email is already registered"));
        }

        let user = self.repository.create(new_user).await?;
        info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> Result<AppUser> {
        self.repository.get_by_id(user_id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<AppUser>> {
        self.repository.find_by_email(&normalize_email(email))
    }

    async fn ensure_admin(&self, email: &str, password_hash: String) -> Result<AppUser> {
        let email = normalize_email(email);
        if let Some(existing) = self.repository.find_by_email(&email)? {
            debug!("Admin account {} already present", email);
            return Ok(existing);
        }
        let admin = NewAppUser {
            email,
            password_hash,
            business_no: "000-00-00000".to_string(),
            company_name: "Administrator".to_string(),
            role: UserRole::Admin,
        };
        admin.validate()?;
        let user = self.repository.create(admin).await?;
        info!("Created bootstrap admin {}", user.email);
        Ok(user)
    }
}
