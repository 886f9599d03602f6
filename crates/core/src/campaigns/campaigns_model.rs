//! Campaign domain models and lifecycle rules.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Error, Result};
use crate::filters::FilterSpec;
use crate::wallet::WalletTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Draft,
    Sending,
    Completed,
    Failed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "DRAFT",
            CampaignStatus::Sending => "SENDING",
            CampaignStatus::Completed => "COMPLETED",
            CampaignStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(CampaignStatus::Draft),
            "SENDING" => Some(CampaignStatus::Sending),
            "COMPLETED" => Some(CampaignStatus::Completed),
            "FAILED" => Some(CampaignStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CampaignStatus::Completed | CampaignStatus::Failed)
    }

    /// Terminal state once no target is pending. A campaign fails only when
    /// it had targets and none of them was delivered.
    pub fn after_delivery(delivered: i64, failed: i64) -> CampaignStatus {
        if failed > 0 && delivered == 0 {
            CampaignStatus::Failed
        } else {
            CampaignStatus::Completed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(DeliveryStatus::Pending),
            "DELIVERED" => Some(DeliveryStatus::Delivered),
            "FAILED" => Some(DeliveryStatus::Failed),
            _ => None,
        }
    }
}

/// Domain model representing a campaign.
///
/// `recipients_count`, `price_per_recipient` and `estimated_cost` are frozen
/// at creation; `final_cost` is frozen at send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message_text: String,
    pub link: Option<String>,
    pub filters: FilterSpec,
    pub price_per_recipient: i64,
    pub estimated_cost: i64,
    pub final_cost: Option<i64>,
    pub recipients_count: i64,
    pub status: CampaignStatus,
    pub created_at: NaiveDateTime,
}

impl Campaign {
    /// Guards of the DRAFT -> SENDING transition.
    pub fn ensure_sendable_by(&self, actor_id: &str) -> Result<()> {
        if self.user_id != actor_id {
            return Err(Error::PermissionDenied(format!(
                "No permission to send campaign {}",
                self.id
            )));
        }
        if self.status != CampaignStatus::Draft {
            return Err(Error::InvalidState(format!(
                "Campaign {} is {} and cannot be sent",
                self.id,
                self.status.as_str()
            )));
        }
        Ok(())
    }
}

/// Input model for creating a campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub title: String,
    pub message_text: String,
    pub link: Option<String>,
    #[serde(default)]
    pub filters: Value,
}

impl NewCampaign {
    /// Validates text fields and returns the normalized link.
    pub fn validate(&self) -> Result<Option<String>> {
        if self.title.trim().is_empty() {
            return Err(Error::invalid_input("Campaign title cannot be empty"));
        }
        if self.message_text.trim().is_empty() {
            return Err(Error::invalid_input("Message text cannot be empty"));
        }
        let link = match self.link.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let parsed = url::Url::parse(raw)
                    .map_err(|e| Error::invalid_input(format!("Invalid link '{}': {}", raw, e)))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(Error::invalid_input("Link must be an http or https URL"));
                }
                Some(raw.to_string())
            }
        };
        Ok(link)
    }
}

/// A priced, validated campaign ready to be persisted as DRAFT.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDraft {
    pub user_id: String,
    pub title: String,
    pub message_text: String,
    pub link: Option<String>,
    pub filters: FilterSpec,
    pub price_per_recipient: i64,
    pub estimated_cost: i64,
    pub recipients_count: i64,
    pub created_at: NaiveDateTime,
}

/// One recipient of a sent campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignTarget {
    pub id: String,
    pub campaign_id: String,
    pub customer_id: String,
    pub delivery_status: DeliveryStatus,
    pub sent_at: Option<NaiveDateTime>,
    pub read_at: Option<NaiveDateTime>,
    pub click_at: Option<NaiveDateTime>,
}

/// Parameters of the atomic send unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub campaign_id: String,
    pub actor_id: String,
    /// Year the stored filter spec's ages are evaluated against.
    pub reference_year: i32,
    /// Timestamp of the debit row.
    pub now: NaiveDateTime,
}

/// Result of a committed send.
#[derive(Debug, Clone, PartialEq)]
pub struct SendReceipt {
    pub campaign: Campaign,
    pub targets_created: i64,
    /// `None` when the campaign cost nothing.
    pub debit: Option<WalletTransaction>,
}

/// Result of a delivery pass over a campaign's pending targets.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub campaign: Campaign,
    pub delivered_now: i64,
    pub delivered_total: i64,
    pub failed_total: i64,
    /// True when this pass moved the campaign out of SENDING.
    pub transitioned: bool,
}

/// What a caller of `send_campaign` gets back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    pub campaign: Campaign,
    pub targets_created: i64,
    pub charged: i64,
    pub balance_after: Option<i64>,
}
