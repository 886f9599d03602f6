use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use geocast_core::campaigns as core_campaigns;
use geocast_core::pricing::PriceQuote;
use geocast_core::users::AppUser;
use geocast_core::wallet::WalletTransaction;

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub business_no: String,
    pub company_name: String,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub business_no: String,
    pub company_name: String,
    pub role: String,
    pub points: i64,
    pub created_at: NaiveDateTime,
}

impl From<AppUser> for User {
    fn from(u: AppUser) -> Self {
        Self {
            id: u.id,
            email: u.email,
            business_no: u.business_no,
            company_name: u.company_name,
            role: u.role.as_str().to_string(),
            points: u.points,
            created_at: u.created_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct PreviewRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub filters: Value,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPreview {
    pub recipients: i64,
    pub active_filter_count: usize,
    pub unit_price: i64,
    pub estimated_cost: i64,
}

impl From<PriceQuote> for CampaignPreview {
    fn from(q: PriceQuote) -> Self {
        Self {
            recipients: q.recipients,
            active_filter_count: q.active_filter_count,
            unit_price: q.unit_price,
            estimated_cost: q.estimated_cost,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub title: String,
    pub message_text: String,
    pub link: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub filters: Value,
}

impl From<NewCampaign> for core_campaigns::NewCampaign {
    fn from(c: NewCampaign) -> Self {
        Self {
            title: c.title,
            message_text: c.message_text,
            link: c.link,
            filters: c.filters,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message_text: String,
    pub link: Option<String>,
    #[schema(value_type = Object)]
    pub filters: Value,
    pub price_per_recipient: i64,
    pub estimated_cost: i64,
    pub final_cost: Option<i64>,
    pub recipients_count: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<core_campaigns::Campaign> for Campaign {
    fn from(c: core_campaigns::Campaign) -> Self {
        Self {
            filters: c.filters.to_value(),
            status: c.status.as_str().to_string(),
            id: c.id,
            user_id: c.user_id,
            title: c.title,
            message_text: c.message_text,
            link: c.link,
            price_per_recipient: c.price_per_recipient,
            estimated_cost: c.estimated_cost,
            final_cost: c.final_cost,
            recipients_count: c.recipients_count,
            created_at: c.created_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub campaign: Campaign,
    pub targets_created: i64,
    pub charged: i64,
    pub balance_after: Option<i64>,
}

impl From<core_campaigns::SendOutcome> for SendResult {
    fn from(o: core_campaigns::SendOutcome) -> Self {
        Self {
            campaign: o.campaign.into(),
            targets_created: o.targets_created,
            charged: o.charged,
            balance_after: o.balance_after,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug, Clone)]
pub struct ChargeRequest {
    pub amount: i64,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Value,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: i64,
    pub balance_after: i64,
    #[schema(value_type = Object)]
    pub metadata: Value,
    pub created_at: NaiveDateTime,
}

impl From<WalletTransaction> for Transaction {
    fn from(t: WalletTransaction) -> Self {
        Self {
            id: t.id,
            transaction_type: t.transaction_type.as_str().to_string(),
            amount: t.amount,
            balance_after: t.balance_after,
            metadata: t.metadata,
            created_at: t.created_at,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct Balance {
    pub balance: i64,
}

/// Paging plus an optional JSON-encoded filter spec, as used by listing endpoints.
#[derive(Deserialize, IntoParams, Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// JSON filter specification.
    pub filters: Option<String>,
}
