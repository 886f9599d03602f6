use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::{debug, info};
use uuid::Uuid;

use geocast_core::campaigns::{
    Campaign, CampaignDraft, CampaignRepositoryTrait, CampaignStatus, CampaignTarget,
    DeliveryReport, DeliveryStatus, SendReceipt, SendRequest,
};
use geocast_core::wallet::LedgerEntry;
use geocast_core::Result;

use super::model::{CampaignDB, CampaignTargetDB};
use crate::customers::load_audience;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{campaign_targets, campaigns};
use crate::wallet::append_entry;

// Keeps each multi-row INSERT well under SQLite's bound-parameter limit.
const TARGET_INSERT_CHUNK: usize = 500;

pub struct CampaignRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CampaignRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn load_campaign(conn: &mut SqliteConnection, campaign_id: &str) -> Result<Campaign> {
    let row = campaigns::table
        .find(campaign_id)
        .select(CampaignDB::as_select())
        .first(conn)
        .map_err(not_found_as("Campaign", campaign_id))?;
    Campaign::try_from(row)
}

fn to_campaigns(rows: Vec<CampaignDB>) -> Result<Vec<Campaign>> {
    rows.into_iter().map(Campaign::try_from).collect()
}

fn count_targets(conn: &mut SqliteConnection, campaign_id: &str, status: DeliveryStatus) -> Result<i64> {
    let total = campaign_targets::table
        .filter(campaign_targets::campaign_id.eq(campaign_id))
        .filter(campaign_targets::delivery_status.eq(status.as_str()))
        .count()
        .get_result::<i64>(conn)
        .map_err(StorageError::from)?;
    Ok(total)
}

#[async_trait]
impl CampaignRepositoryTrait for CampaignRepository {
    async fn create(&self, draft: CampaignDraft) -> Result<Campaign> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Campaign> {
                let row = CampaignDB {
                    id: Uuid::now_v7().to_string(),
                    user_id: draft.user_id,
                    title: draft.title,
                    message_text: draft.message_text,
                    link: draft.link,
                    filters: serde_json::to_string(&draft.filters).map_err(StorageError::from)?,
                    price_per_recipient: draft.price_per_recipient,
                    estimated_cost: draft.estimated_cost,
                    final_cost: None,
                    recipients_count: draft.recipients_count,
                    status: CampaignStatus::Draft.as_str().to_string(),
                    created_at: draft.created_at,
                };
                let saved = diesel::insert_into(campaigns::table)
                    .values(&row)
                    .returning(CampaignDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Campaign::try_from(saved)
            })
            .await
    }

    fn get_by_id(&self, campaign_id: &str) -> Result<Campaign> {
        let mut conn = get_connection(&self.pool)?;
        load_campaign(&mut conn, campaign_id)
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Campaign>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = campaigns::table
            .filter(campaigns::user_id.eq(user_id))
            .order((campaigns::created_at.desc(), campaigns::id.desc()))
            .select(CampaignDB::as_select())
            .load::<CampaignDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_campaigns(rows)
    }

    fn list_by_status(&self, status: CampaignStatus) -> Result<Vec<Campaign>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = campaigns::table
            .filter(campaigns::status.eq(status.as_str()))
            .order(campaigns::created_at.asc())
            .select(CampaignDB::as_select())
            .load::<CampaignDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_campaigns(rows)
    }

    fn list_targets(&self, campaign_id: &str) -> Result<Vec<CampaignTarget>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = campaign_targets::table
            .filter(campaign_targets::campaign_id.eq(campaign_id))
            .order(campaign_targets::customer_id.asc())
            .select(CampaignTargetDB::as_select())
            .load::<CampaignTargetDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(CampaignTarget::try_from).collect()
    }

    async fn commit_send(&self, request: SendRequest) -> Result<SendReceipt> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SendReceipt> {
                let campaign = load_campaign(conn, &request.campaign_id)?;
                campaign.ensure_sendable_by(&request.actor_id)?;

                let debit = if campaign.estimated_cost > 0 {
                    let entry =
                        LedgerEntry::campaign_debit(campaign.estimated_cost, campaign.id.clone())?;
                    Some(append_entry(conn, &campaign.user_id, entry, request.now)?)
                } else {
                    None
                };

                let audience = campaign
                    .filters
                    .resolve(request.reference_year)
                    .query;
                let recipients = load_audience(conn, &audience)?;
                let targets: Vec<CampaignTargetDB> = recipients
                    .iter()
                    .map(|customer| CampaignTargetDB {
                        id: Uuid::now_v7().to_string(),
                        campaign_id: campaign.id.clone(),
                        customer_id: customer.id.clone(),
                        delivery_status: DeliveryStatus::Pending.as_str().to_string(),
                        sent_at: None,
                        read_at: None,
                        click_at: None,
                    })
                    .collect();
                for chunk in targets.chunks(TARGET_INSERT_CHUNK) {
                    diesel::insert_into(campaign_targets::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                let updated = diesel::update(campaigns::table.find(&campaign.id))
                    .set((
                        campaigns::status.eq(CampaignStatus::Sending.as_str()),
                        campaigns::final_cost.eq(Some(campaign.estimated_cost)),
                    ))
                    .returning(CampaignDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                debug!(
                    "Campaign {} committed with {} targets",
                    campaign.id,
                    targets.len()
                );
                Ok(SendReceipt {
                    campaign: Campaign::try_from(updated)?,
                    targets_created: targets.len() as i64,
                    debit,
                })
            })
            .await
    }

    async fn complete_delivery(
        &self,
        campaign_id: &str,
        now: NaiveDateTime,
    ) -> Result<DeliveryReport> {
        let campaign_id = campaign_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<DeliveryReport> {
                let campaign = load_campaign(conn, &campaign_id)?;

                let delivered_now = diesel::update(
                    campaign_targets::table
                        .filter(campaign_targets::campaign_id.eq(&campaign_id))
                        .filter(
                            campaign_targets::delivery_status.eq(DeliveryStatus::Pending.as_str()),
                        ),
                )
                .set((
                    campaign_targets::delivery_status.eq(DeliveryStatus::Delivered.as_str()),
                    campaign_targets::sent_at.eq(Some(now)),
                ))
                .execute(conn)
                .map_err(StorageError::from)? as i64;

                let delivered_total = count_targets(conn, &campaign_id, DeliveryStatus::Delivered)?;
                let failed_total = count_targets(conn, &campaign_id, DeliveryStatus::Failed)?;

                if campaign.status != CampaignStatus::Sending {
                    return Ok(DeliveryReport {
                        campaign,
                        delivered_now,
                        delivered_total,
                        failed_total,
                        transitioned: false,
                    });
                }

                let terminal = CampaignStatus::after_delivery(delivered_total, failed_total);
                let updated = diesel::update(campaigns::table.find(&campaign_id))
                    .set(campaigns::status.eq(terminal.as_str()))
                    .returning(CampaignDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                info!(
                    "Campaign {} delivered: {} targets, status {}",
                    campaign_id,
                    delivered_total,
                    terminal.as_str()
                );
                Ok(DeliveryReport {
                    campaign: Campaign::try_from(updated)?,
                    delivered_now,
                    delivered_total,
                    failed_total,
                    transitioned: true,
                })
            })
            .await
    }
}
