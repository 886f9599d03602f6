use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::engagement_model::{
    AudienceDemographic, CustomerInbox, InboxMessage, MarkOutcome, TargetEngagement,
};
use crate::errors::Result;

/// Trait for engagement persistence.
///
/// The mark operations are single conditional updates. They return whether
/// a row changed and fail with `NotFound` only for unknown targets.
#[async_trait]
pub trait EngagementRepositoryTrait: Send + Sync {
    async fn mark_read(&self, target_id: &str, now: NaiveDateTime) -> Result<bool>;
    /// Sets `click_at` and, when still unset, `read_at`.
    async fn mark_clicked(&self, target_id: &str, now: NaiveDateTime) -> Result<bool>;
    /// Link of the campaign a target belongs to.
    fn get_target_link(&self, target_id: &str) -> Result<Option<String>>;
    /// Sent messages of a customer, newest first.
    fn list_inbox_messages(&self, customer_id: &str) -> Result<Vec<InboxMessage>>;
    fn list_target_engagement(&self, campaign_ids: &[String]) -> Result<Vec<TargetEngagement>>;
    fn list_targeted_demographics(
        &self,
        campaign_ids: &[String],
    ) -> Result<Vec<AudienceDemographic>>;
}

#[async_trait]
pub trait EngagementServiceTrait: Send + Sync {
    async fn mark_read(&self, target_id: &str) -> Result<MarkOutcome>;
    async fn mark_clicked(&self, target_id: &str) -> Result<MarkOutcome>;
    /// Where a click on `target_id` should land.
    fn click_destination(&self, target_id: &str, fallback: &str) -> Result<String>;
    fn customer_inbox(&self, customer_id: &str) -> Result<CustomerInbox>;
}
