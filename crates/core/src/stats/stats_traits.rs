use super::stats_model::{CampaignStats, DashboardStats};
use crate::errors::Result;
use crate::users::UserIdentity;

pub trait StatsServiceTrait: Send + Sync {
    /// Requires the requester to own the campaign or be an admin.
    fn get_campaign_stats(&self, campaign_id: &str, requester: &UserIdentity)
        -> Result<CampaignStats>;
    fn get_dashboard_stats(&self, user_id: &str) -> Result<DashboardStats>;
}
