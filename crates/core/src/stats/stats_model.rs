use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::campaigns::{Campaign, CampaignStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub sent: i64,
    pub read: i64,
    pub click: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub label: String,
    pub sent: i64,
    pub read: i64,
    pub click: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub campaign: Campaign,
    pub sent: i64,
    pub read: i64,
    pub click: i64,
    /// read / sent, in [0, 1].
    pub read_rate: f64,
    pub click_rate: f64,
    pub hourly_stats: Vec<HourlyBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub sent: i64,
    pub read: i64,
    pub click: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentCampaign {
    pub id: String,
    pub title: String,
    pub status: CampaignStatus,
    pub recipients_count: i64,
    pub estimated_cost: i64,
    pub final_cost: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl From<&Campaign> for RecentCampaign {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            status: c.status,
            recipients_count: c.recipients_count,
            estimated_cost: c.estimated_cost,
            final_cost: c.final_cost,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGenderBand {
    pub band: String,
    pub male: i64,
    pub female: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sent: i64,
    pub total_read: i64,
    pub total_click: i64,
    pub total_spent: i64,
    pub read_rate: f64,
    pub click_rate: f64,
    pub daily_series: Vec<DailyPoint>,
    pub recent_campaigns: Vec<RecentCampaign>,
    pub age_gender_distribution: Vec<AgeGenderBand>,
}
