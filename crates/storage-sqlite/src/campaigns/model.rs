//! Database models for campaigns and campaign targets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use geocast_core::campaigns::{Campaign, CampaignStatus, CampaignTarget, DeliveryStatus};
use geocast_core::filters::FilterSpec;
use geocast_core::{Error, Result};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::campaigns)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CampaignDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message_text: String,
    pub link: Option<String>,
    pub filters: String,
    pub price_per_recipient: i64,
    pub estimated_cost: i64,
    pub final_cost: Option<i64>,
    pub recipients_count: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<CampaignDB> for Campaign {
    type Error = Error;

    fn try_from(db: CampaignDB) -> Result<Self> {
        let status = CampaignStatus::parse(&db.status).ok_or_else(|| {
            Error::Unexpected(format!("Unknown campaign status '{}' on {}", db.status, db.id))
        })?;
        let raw: serde_json::Value = serde_json::from_str(&db.filters)?;
        Ok(Self {
            filters: FilterSpec::parse(&raw)?,
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            message_text: db.message_text,
            link: db.link,
            price_per_recipient: db.price_per_recipient,
            estimated_cost: db.estimated_cost,
            final_cost: db.final_cost,
            recipients_count: db.recipients_count,
            status,
            created_at: db.created_at,
        })
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::campaign_targets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CampaignTargetDB {
    pub id: String,
    pub campaign_id: String,
    pub customer_id: String,
    pub delivery_status: String,
    pub sent_at: Option<NaiveDateTime>,
    pub read_at: Option<NaiveDateTime>,
    pub click_at: Option<NaiveDateTime>,
}

impl TryFrom<CampaignTargetDB> for CampaignTarget {
    type Error = Error;

    fn try_from(db: CampaignTargetDB) -> Result<Self> {
        let delivery_status = DeliveryStatus::parse(&db.delivery_status).ok_or_else(|| {
            Error::Unexpected(format!(
                "Unknown delivery status '{}' on target {}",
                db.delivery_status, db.id
            ))
        })?;
        Ok(Self {
            id: db.id,
            campaign_id: db.campaign_id,
            customer_id: db.customer_id,
            delivery_status,
            sent_at: db.sent_at,
            read_at: db.read_at,
            click_at: db.click_at,
        })
    }
}
