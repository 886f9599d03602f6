use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;

use super::campaigns_model::{
    Campaign, CampaignDraft, CampaignStatus, CampaignTarget, DeliveryReport, NewCampaign,
    SendOutcome, SendReceipt, SendRequest,
};
use crate::errors::Result;
use crate::pricing::PriceQuote;
use crate::users::UserIdentity;

/// Trait for campaign repository operations
#[async_trait]
pub trait CampaignRepositoryTrait: Send + Sync {
    async fn create(&self, draft: CampaignDraft) -> Result<Campaign>;
    fn get_by_id(&self, campaign_id: &str) -> Result<Campaign>;
    /// Newest first.
    fn list_by_user(&self, user_id: &str) -> Result<Vec<Campaign>>;
    fn list_by_status(&self, status: CampaignStatus) -> Result<Vec<Campaign>>;
    fn list_targets(&self, campaign_id: &str) -> Result<Vec<CampaignTarget>>;

    /// Runs the whole DRAFT -> SENDING transition as one transaction:
    /// re-checks the send guards on the stored row, debits the wallet for
    /// the estimated cost, re-resolves the stored filter spec, inserts one
    /// PENDING target per matching customer and freezes the final cost.
    /// Any failure leaves no trace.
    async fn commit_send(&self, request: SendRequest) -> Result<SendReceipt>;

    /// Marks every PENDING target delivered at `now` and, if the campaign
    /// is SENDING, moves it to its terminal state. Idempotent.
    async fn complete_delivery(&self, campaign_id: &str, now: NaiveDateTime)
        -> Result<DeliveryReport>;
}

/// Trait for campaign service operations
#[async_trait]
pub trait CampaignServiceTrait: Send + Sync {
    fn preview(&self, filters: &Value) -> Result<PriceQuote>;
    async fn create_campaign(&self, owner: &UserIdentity, new_campaign: NewCampaign)
        -> Result<Campaign>;
    /// Commits the send and then runs delivery.
    async fn send_campaign(&self, campaign_id: &str, actor: &UserIdentity) -> Result<SendOutcome>;
    async fn deliver(&self, campaign_id: &str) -> Result<DeliveryReport>;
    fn list_user_campaigns(&self, user_id: &str) -> Result<Vec<Campaign>>;
    fn get_campaign(&self, campaign_id: &str, requester: &UserIdentity) -> Result<Campaign>;
    /// Finishes delivery of campaigns left in SENDING. Returns how many
    /// campaigns reached a terminal state.
    async fn resume_pending_deliveries(&self) -> Result<usize>;
}
