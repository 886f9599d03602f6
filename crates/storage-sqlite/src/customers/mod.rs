//! SQLite storage implementation for customers and audience queries.

mod model;
mod query;
mod repository;

pub use model::CustomerDB;
pub use query::{count_audience, load_audience, page_audience};
pub use repository::CustomerRepository;
