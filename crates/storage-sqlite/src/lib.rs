//! SQLite storage implementation for Geocast.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `geocast-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!    storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```
//!
//! All writes go through a single writer actor ([`WriteHandle`]), each job in
//! its own IMMEDIATE transaction. Reads use pooled connections.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod campaigns;
pub mod customers;
pub mod engagement;
pub mod notifications;
pub mod users;
pub mod wallet;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use campaigns::CampaignRepository;
pub use customers::CustomerRepository;
pub use engagement::EngagementRepository;
pub use notifications::NotificationRepository;
pub use users::UserRepository;
pub use wallet::WalletRepository;

// Re-export from geocast-core for convenience
pub use geocast_core::errors::{DatabaseError, Error, Result};

#[cfg(test)]
pub(crate) mod test_support;
