//! Pricing - per-recipient unit price by number of active filters.

mod pricing_model;

pub use pricing_model::{estimated_cost, unit_price, PriceQuote, PRICE_TABLE};
