use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde_json::Value;

use super::campaigns_model::{
    Campaign, CampaignDraft, CampaignStatus, DeliveryReport, NewCampaign, SendOutcome,
    SendRequest,
};
use super::campaigns_traits::{CampaignRepositoryTrait, CampaignServiceTrait};
use crate::customers::CustomerServiceTrait;
use crate::errors::{Error, Result};
use crate::filters::FilterSpec;
use crate::notifications::{NewNotification, NotificationServiceTrait};
use crate::pricing::PriceQuote;
use crate::users::UserIdentity;
use crate::utils::ReportingCalendar;

/// Service orchestrating campaign creation, sending and delivery
pub struct CampaignService {
    repository: Arc<dyn CampaignRepositoryTrait>,
    customer_service: Arc<dyn CustomerServiceTrait>,
    notification_service: Arc<dyn NotificationServiceTrait>,
    calendar: ReportingCalendar,
}

impl CampaignService {
    pub fn new(
        repository: Arc<dyn CampaignRepositoryTrait>,
        customer_service: Arc<dyn CustomerServiceTrait>,
        notification_service: Arc<dyn NotificationServiceTrait>,
        calendar: ReportingCalendar,
    ) -> Self {
        Self {
            repository,
            customer_service,
            notification_service,
            calendar,
        }
    }

    fn quote(&self, filters: &FilterSpec) -> Result<PriceQuote> {
        let resolved = filters.resolve(self.calendar.reference_year());
        let recipients = self.customer_service.count_matching(&resolved.query)?;
        Ok(PriceQuote::new(recipients, resolved.active_filter_count))
    }

    async fn notify_completed(&self, report: &DeliveryReport) {
        let campaign = &report.campaign;
        let notice = NewNotification::campaign_completed(
            &campaign.user_id,
            &campaign.id,
            &campaign.title,
            report.delivered_total,
        );
        if let Err(e) = self.notification_service.enqueue(notice).await {
            warn!(
                "completion notification failed campaign_id={}: {}",
                campaign.id, e
            );
        }
    }
}

#[async_trait]
impl CampaignServiceTrait for CampaignService {
    fn preview(&self, filters: &Value) -> Result<PriceQuote> {
        let spec = FilterSpec::parse(filters)?;
        self.quote(&spec)
    }

    async fn create_campaign(
        &self,
        owner: &UserIdentity,
        new_campaign: NewCampaign,
    ) -> Result<Campaign> {
        let link = new_campaign.validate()?;
        let filters = FilterSpec::parse(&new_campaign.filters)?;
        let quote = self.quote(&filters)?;

        let draft = CampaignDraft {
            user_id: owner.user_id.clone(),
            title: new_campaign.title.trim().to_string(),
            message_text: new_campaign.message_text,
            link,
            filters,
            price_per_recipient: quote.unit_price,
            estimated_cost: quote.estimated_cost,
            recipients_count: quote.recipients,
            created_at: self.calendar.now(),
        };
        let campaign = self.repository.create(draft).await?;
        info!(
            "campaign created campaign_id={} user_id={} recipients={} estimated_cost={}",
            campaign.id, campaign.user_id, campaign.recipients_count, campaign.estimated_cost
        );
        Ok(campaign)
    }

    async fn send_campaign(&self, campaign_id: &str, actor: &UserIdentity) -> Result<SendOutcome> {
        // Fail fast on the guards; the repository re-checks them in its transaction.
        self.repository
            .get_by_id(campaign_id)?
            .ensure_sendable_by(&actor.user_id)?;

        let receipt = self
            .repository
            .commit_send(SendRequest {
                campaign_id: campaign_id.to_string(),
                actor_id: actor.user_id.clone(),
                reference_year: self.calendar.reference_year(),
                now: self.calendar.now(),
            })
            .await?;
        let charged = receipt.campaign.final_cost.unwrap_or(0);
        let balance_after = receipt.debit.as_ref().map(|tx| tx.balance_after);
        info!(
            "campaign send committed campaign_id={} user_id={} targets={} charged={}",
            campaign_id, actor.user_id, receipt.targets_created, charged
        );

        let campaign = match self.deliver(campaign_id).await {
            Ok(report) => report.campaign,
            Err(e) => {
                // The send is committed; the recovery job finishes delivery.
                error!("delivery failed campaign_id={}: {}", campaign_id, e);
                receipt.campaign
            }
        };

        Ok(SendOutcome {
            campaign,
            targets_created: receipt.targets_created,
            charged,
            balance_after,
        })
    }

    async fn deliver(&self, campaign_id: &str) -> Result<DeliveryReport> {
        let campaign = self.repository.get_by_id(campaign_id)?;
        if campaign.status == CampaignStatus::Draft {
            return Err(Error::InvalidState(format!(
                "Campaign {} has not been sent",
                campaign_id
            )));
        }
        if campaign.status.is_terminal() {
            debug!("campaign {} already {}", campaign_id, campaign.status.as_str());
        }

        let report = self
            .repository
            .complete_delivery(campaign_id, self.calendar.now())
            .await?;
        if report.transitioned {
            info!(
                "campaign delivered campaign_id={} status={} delivered={} failed={}",
                campaign_id,
                report.campaign.status.as_str(),
                report.delivered_total,
                report.failed_total
            );
            self.notify_completed(&report).await;
        }
        Ok(report)
    }

    fn list_user_campaigns(&self, user_id: &str) -> Result<Vec<Campaign>> {
        self.repository.list_by_user(user_id)
    }

    fn get_campaign(&self, campaign_id: &str, requester: &UserIdentity) -> Result<Campaign> {
        let campaign = self.repository.get_by_id(campaign_id)?;
        if !requester.can_access(&campaign.user_id) {
            return Err(Error::PermissionDenied(format!(
                "No permission to view campaign {}",
                campaign_id
            )));
        }
        Ok(campaign)
    }

    async fn resume_pending_deliveries(&self) -> Result<usize> {
        let stuck = self.repository.list_by_status(CampaignStatus::Sending)?;
        let mut finished = 0;
        for campaign in stuck {
            match self.deliver(&campaign.id).await {
                Ok(report) if report.transitioned => finished += 1,
                Ok(_) => {}
                Err(e) => warn!("delivery recovery failed campaign_id={}: {}", campaign.id, e),
            }
        }
        Ok(finished)
    }
}
