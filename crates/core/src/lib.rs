//! Geocast Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for location-targeted messaging
//! campaigns. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod campaigns;
pub mod constants;
pub mod customers;
pub mod engagement;
pub mod errors;
pub mod filters;
pub mod notifications;
pub mod pricing;
pub mod stats;
pub mod users;
pub mod utils;
pub mod wallet;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
