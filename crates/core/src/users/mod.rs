//! Users module - accounts of the companies running campaigns.

mod users_model;
mod users_service;
mod users_traits;


pub use users_model::{normalize_email, AppUser, NewAppUser, UserIdentity, UserRole};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
