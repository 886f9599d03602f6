//! SQLite storage implementation for users.

mod model;
mod repository;

pub use model::AppUserDB;
pub use repository::UserRepository;
