/// Default page size for paged listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound for a requested page size
pub const MAX_PAGE_SIZE: i64 = 500;

/// Number of daily points in the dashboard time series
pub const DASHBOARD_SERIES_DAYS: i64 = 7;

/// Number of campaigns shown in the dashboard "recent" list
pub const RECENT_CAMPAIGNS_LIMIT: usize = 5;

/// Mean Earth radius in meters (IUGG)
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Metadata key linking a ledger row to the campaign it paid for
pub const CAMPAIGN_ID_METADATA_KEY: &str = "campaign_id";

/// Largest age accepted in an age-range filter
pub const MAX_FILTER_AGE: u32 = 150;
