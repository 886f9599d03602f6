use std::sync::Arc;

use log::debug;

use super::stats_calculator::{
    age_gender_distribution, daily_series, engagement_counts, hourly_histogram, rate,
};
use super::stats_model::{CampaignStats, DashboardStats, RecentCampaign};
use super::stats_traits::StatsServiceTrait;
use crate::campaigns::{CampaignRepositoryTrait, CampaignStatus};
use crate::constants::{DASHBOARD_SERIES_DAYS, RECENT_CAMPAIGNS_LIMIT};
use crate::engagement::EngagementRepositoryTrait;
use crate::errors::{Error, Result};
use crate::users::UserIdentity;
use crate::utils::ReportingCalendar;

/// Read-side service deriving metrics from campaigns and their targets
pub struct StatsService {
    campaign_repository: Arc<dyn CampaignRepositoryTrait>,
    engagement_repository: Arc<dyn EngagementRepositoryTrait>,
    calendar: ReportingCalendar,
}

impl StatsService {
    pub fn new(
        campaign_repository: Arc<dyn CampaignRepositoryTrait>,
        engagement_repository: Arc<dyn EngagementRepositoryTrait>,
        calendar: ReportingCalendar,
    ) -> Self {
        Self {
            campaign_repository,
            engagement_repository,
            calendar,
        }
    }
}

impl StatsServiceTrait for StatsService {
    fn get_campaign_stats(
        &self,
        campaign_id: &str,
        requester: &UserIdentity,
    ) -> Result<CampaignStats> {
        let campaign = self.campaign_repository.get_by_id(campaign_id)?;
        if !requester.can_access(&campaign.user_id) {
            return Err(Error::PermissionDenied(format!(
                "No permission to view statistics of campaign {}",
                campaign_id
            )));
        }

        let rows = self
            .engagement_repository
            .list_target_engagement(&[campaign.id.clone()])?;
        let counts = engagement_counts(&rows);
        Ok(CampaignStats {
            sent: counts.sent,
            read: counts.read,
            click: counts.click,
            read_rate: rate(counts.read, counts.sent),
            click_rate: rate(counts.click, counts.sent),
            hourly_stats: hourly_histogram(&rows, self.calendar.tz()),
            campaign,
        })
    }

    fn get_dashboard_stats(&self, user_id: &str) -> Result<DashboardStats> {
        let campaigns = self.campaign_repository.list_by_user(user_id)?;
        let completed: Vec<_> = campaigns
            .iter()
            .filter(|c| c.status == CampaignStatus::Completed)
            .collect();
        let completed_ids: Vec<String> = completed.iter().map(|c| c.id.clone()).collect();
        debug!(
            "dashboard user_id={} campaigns={} completed={}",
            user_id,
            campaigns.len(),
            completed_ids.len()
        );

        let (rows, demographics) = if completed_ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            (
                self.engagement_repository
                    .list_target_engagement(&completed_ids)?,
                self.engagement_repository
                    .list_targeted_demographics(&completed_ids)?,
            )
        };

        let counts = engagement_counts(&rows);
        let total_spent = completed.iter().map(|c| c.final_cost.unwrap_or(0)).sum();

        Ok(DashboardStats {
            total_sent: counts.sent,
            total_read: counts.read,
            total_click: counts.click,
            total_spent,
            read_rate: rate(counts.read, counts.sent),
            click_rate: rate(counts.click, counts.sent),
            daily_series: daily_series(
                &rows,
                self.calendar.today(),
                DASHBOARD_SERIES_DAYS,
                self.calendar.tz(),
            ),
            recent_campaigns: campaigns
                .iter()
                .take(RECENT_CAMPAIGNS_LIMIT)
                .map(RecentCampaign::from)
                .collect(),
            age_gender_distribution: age_gender_distribution(
                &demographics,
                self.calendar.reference_year(),
            ),
        })
    }
}
