//! User domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(UserRole::User),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Domain model representing a registered company account.
///
/// `points` is a cached projection of the wallet ledger and is never
/// authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub business_no: String,
    pub company_name: String,
    pub role: UserRole,
    pub points: i64,
    pub created_at: NaiveDateTime,
}

impl AppUser {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Input model for registering a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewAppUser {
    pub email: String,
    pub password_hash: String,
    pub business_no: String,
    pub company_name: String,
    pub role: UserRole,
}

impl NewAppUser {
    pub fn validate(&self) -> Result<()> {
        if !self.email.contains('@') || self.email.trim().len() < 3 {
            return Err(Error::invalid_input("A valid email is required"));
        }
        if self.password_hash.is_empty() {
            return Err(Error::invalid_input("Password hash is required"));
        }
        if self.business_no.trim().is_empty() {
            return Err(Error::invalid_input("Business number is required"));
        }
        if self.company_name.trim().is_empty() {
            return Err(Error::invalid_input("Company name is required"));
        }
        Ok(())
    }
}

/// Authenticated caller, as resolved by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl UserIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn ensure_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::PermissionDenied(
                "administrator role required".to_string(),
            ))
        }
    }

    /// Owner of a resource, or an admin.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.user_id == owner_id || self.is_admin()
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
