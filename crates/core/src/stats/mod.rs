//! Statistics aggregator - campaign and dashboard metrics.

mod stats_calculator;
mod stats_model;
mod stats_service;
mod stats_traits;


pub use stats_calculator::{
    age_gender_distribution, daily_series, engagement_counts, hourly_histogram, rate,
    AGE_BANDS,
};
pub use stats_model::{
    AgeGenderBand, CampaignStats, DailyPoint, DashboardStats, EngagementCounts, HourlyBucket,
    RecentCampaign,
};
pub use stats_service::StatsService;
pub use stats_traits::StatsServiceTrait;
