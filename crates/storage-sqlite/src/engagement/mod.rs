//! SQLite storage implementation for read/click tracking and inbox queries.

mod repository;

pub use repository::EngagementRepository;
