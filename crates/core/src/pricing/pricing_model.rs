use serde::{Deserialize, Serialize};

/// Unit price in points, indexed by active filter count. Non-decreasing.
pub const PRICE_TABLE: [i64; 5] = [50, 70, 110, 130, 150];

/// Unit price for `active_filter_count` filters. Counts beyond the table
/// reuse the highest tier.
pub fn unit_price(active_filter_count: usize) -> i64 {
    let index = active_filter_count.min(PRICE_TABLE.len() - 1);
    PRICE_TABLE[index]
}

pub fn estimated_cost(recipients: i64, unit_price: i64) -> i64 {
    recipients.saturating_mul(unit_price)
}

/// Priced audience snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub recipients: i64,
    pub active_filter_count: usize,
    pub unit_price: i64,
    pub estimated_cost: i64,
}

impl PriceQuote {
    pub fn new(recipients: i64, active_filter_count: usize) -> Self {
        let unit_price = unit_price(active_filter_count);
        Self {
            recipients,
            active_filter_count,
            unit_price,
            estimated_cost: estimated_cost(recipients, unit_price),
        }
    }
}
