use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sql_types::{Text, Timestamp};
use diesel::SqliteConnection;

use geocast_core::customers::Gender;
use geocast_core::engagement::{
    AudienceDemographic, EngagementRepositoryTrait, InboxMessage, TargetEngagement,
};
use geocast_core::{Error, Result};

use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{app_users, campaign_targets, campaigns, customers};

pub struct EngagementRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl EngagementRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn ensure_target_exists(conn: &mut SqliteConnection, target_id: &str) -> Result<()> {
    campaign_targets::table
        .find(target_id)
        .select(campaign_targets::id)
        .first::<String>(conn)
        .map_err(not_found_as("Target", target_id))?;
    Ok(())
}

/// Runs a conditional update. Zero rows means "already marked" for a
/// known target and `NotFound` otherwise.
fn conditional_mark(
    conn: &mut SqliteConnection,
    sql: &'static str,
    target_id: &str,
    now: NaiveDateTime,
) -> Result<bool> {
    let affected = diesel::sql_query(sql)
        .bind::<Timestamp, _>(now)
        .bind::<Text, _>(target_id)
        .execute(conn)
        .map_err(StorageError::from)?;
    if affected == 0 {
        ensure_target_exists(conn, target_id)?;
        return Ok(false);
    }
    Ok(true)
}

const MARK_READ_SQL: &str =
    "UPDATE campaign_targets SET read_at = ?1 WHERE id = ?2 AND read_at IS NULL";

const MARK_CLICKED_SQL: &str = "UPDATE campaign_targets \
     SET click_at = ?1, read_at = COALESCE(read_at, ?1) \
     WHERE id = ?2 AND click_at IS NULL";

#[async_trait]
impl EngagementRepositoryTrait for EngagementRepository {
    async fn mark_read(&self, target_id: &str, now: NaiveDateTime) -> Result<bool> {
        let target_id = target_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| {
                conditional_mark(conn, MARK_READ_SQL, &target_id, now)
            })
            .await
    }

    async fn mark_clicked(&self, target_id: &str, now: NaiveDateTime) -> Result<bool> {
        let target_id = target_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| {
                conditional_mark(conn, MARK_CLICKED_SQL, &target_id, now)
            })
            .await
    }

    fn get_target_link(&self, target_id: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let link = campaign_targets::table
            .inner_join(campaigns::table)
            .filter(campaign_targets::id.eq(target_id))
            .select(campaigns::link)
            .first::<Option<String>>(&mut conn)
            .map_err(not_found_as("Target", target_id))?;
        Ok(link)
    }

    fn list_inbox_messages(&self, customer_id: &str) -> Result<Vec<InboxMessage>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = campaign_targets::table
            .inner_join(campaigns::table.inner_join(app_users::table))
            .filter(campaign_targets::customer_id.eq(customer_id))
            .filter(campaign_targets::sent_at.is_not_null())
            .order((campaign_targets::sent_at.desc(), campaign_targets::id.desc()))
            .select((
                campaign_targets::id,
                campaigns::id,
                campaigns::title,
                campaigns::message_text,
                campaigns::link,
                app_users::company_name,
                campaign_targets::sent_at,
                campaign_targets::read_at,
                campaign_targets::click_at,
            ))
            .load::<(
                String,
                String,
                String,
                String,
                Option<String>,
                String,
                Option<NaiveDateTime>,
                Option<NaiveDateTime>,
                Option<NaiveDateTime>,
            )>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .map(
                |(target_id, campaign_id, title, message_text, link, company_name, sent_at, read_at, click_at)| {
                    InboxMessage {
                        target_id,
                        campaign_id,
                        title,
                        message_text,
                        link,
                        company_name,
                        sent_at,
                        read_at,
                        click_at,
                    }
                },
            )
            .collect())
    }

    fn list_target_engagement(&self, campaign_ids: &[String]) -> Result<Vec<TargetEngagement>> {
        if campaign_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let rows = campaign_targets::table
            .filter(campaign_targets::campaign_id.eq_any(campaign_ids))
            .select((
                campaign_targets::campaign_id,
                campaign_targets::sent_at,
                campaign_targets::read_at,
                campaign_targets::click_at,
            ))
            .load::<(
                String,
                Option<NaiveDateTime>,
                Option<NaiveDateTime>,
                Option<NaiveDateTime>,
            )>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(campaign_id, sent_at, read_at, click_at)| TargetEngagement {
                campaign_id,
                sent_at,
                read_at,
                click_at,
            })
            .collect())
    }

    fn list_targeted_demographics(
        &self,
        campaign_ids: &[String],
    ) -> Result<Vec<AudienceDemographic>> {
        if campaign_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = get_connection(&self.pool)?;
        // Targets of deleted customers drop out of the join.
        let rows = campaign_targets::table
            .inner_join(customers::table.on(customers::id.eq(campaign_targets::customer_id)))
            .filter(campaign_targets::campaign_id.eq_any(campaign_ids))
            .select((customers::gender, customers::birth_year))
            .load::<(String, i32)>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter()
            .map(|(gender, birth_year)| {
                let gender = Gender::from_code(&gender)
                    .ok_or_else(|| Error::Unexpected(format!("Unknown gender '{}'", gender)))?;
                Ok(AudienceDemographic { gender, birth_year })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaigns::CampaignRepository;
    use crate::customers::CustomerRepository;
    use crate::test_support::{create_user, new_customer, test_db};
    use chrono::Duration;
    use geocast_core::campaigns::{CampaignDraft, CampaignRepositoryTrait, SendRequest};
    use geocast_core::customers::CustomerRepositoryTrait;
    use geocast_core::filters::FilterSpec;

    struct Sent {
        repo: EngagementRepository,
        target_id: String,
        customer_id: String,
        campaign_id: String,
        _db: crate::test_support::TestDb,
    }

    async fn sent_campaign() -> Sent {
        let db = test_db();
        let user = create_user(&db, "owner@example.com").await;
        let customer = CustomerRepository::new(Arc::clone(&db.pool), db.writer.clone())
            .create(new_customer("Kim Minji", Gender::F, 1990, "Seoul", 37.5, 127.0))
            .await
            .unwrap();
        let campaigns = CampaignRepository::new(Arc::clone(&db.pool), db.writer.clone());
        let campaign = campaigns
            .create(CampaignDraft {
                user_id: user.id.clone(),
                title: "Spring sale".to_string(),
                message_text: "20% off".to_string(),
                link: Some("https://example.com".to_string()),
                filters: FilterSpec::default(),
                price_per_recipient: 50,
                estimated_cost: 0,
                recipients_count: 0,
                created_at: chrono::Utc::now().naive_utc(),
            })
            .await
            .unwrap();
        campaigns
            .commit_send(SendRequest {
                campaign_id: campaign.id.clone(),
                actor_id: user.id.clone(),
                reference_year: 2025,
                now: chrono::Utc::now().naive_utc(),
            })
            .await
            .unwrap();
        campaigns
            .complete_delivery(&campaign.id, chrono::Utc::now().naive_utc())
            .await
            .unwrap();
        let target_id = campaigns.list_targets(&campaign.id).unwrap()[0].id.clone();
        Sent {
            repo: EngagementRepository::new(Arc::clone(&db.pool), db.writer.clone()),
            target_id,
            customer_id: customer.id,
            campaign_id: campaign.id,
            _db: db,
        }
    }

    #[tokio::test]
    async fn mark_read_is_idempotent() {
        let sent = sent_campaign().await;
        let first = chrono::Utc::now().naive_utc();
        assert!(sent.repo.mark_read(&sent.target_id, first).await.unwrap());
        let later = first + Duration::minutes(5);
        assert!(!sent.repo.mark_read(&sent.target_id, later).await.unwrap());

        let rows = sent
            .repo
            .list_target_engagement(&[sent.campaign_id.clone()])
            .unwrap();
        assert_eq!(rows[0].read_at, Some(first));
    }

    #[tokio::test]
    async fn click_implies_read_but_keeps_earlier_read() {
        let sent = sent_campaign().await;
        let read = chrono::Utc::now().naive_utc();
        sent.repo.mark_read(&sent.target_id, read).await.unwrap();
        let click = read + Duration::minutes(1);
        assert!(sent.repo.mark_clicked(&sent.target_id, click).await.unwrap());
        assert!(!sent.repo.mark_clicked(&sent.target_id, click).await.unwrap());

        let row = &sent
            .repo
            .list_target_engagement(&[sent.campaign_id.clone()])
            .unwrap()[0];
        assert_eq!(row.read_at, Some(read));
        assert_eq!(row.click_at, Some(click));
    }

    #[tokio::test]
    async fn click_on_unread_sets_both() {
        let sent = sent_campaign().await;
        let now = chrono::Utc::now().naive_utc();
        sent.repo.mark_clicked(&sent.target_id, now).await.unwrap();
        let row = &sent
            .repo
            .list_target_engagement(&[sent.campaign_id.clone()])
            .unwrap()[0];
        assert_eq!(row.read_at, Some(now));
        assert_eq!(row.click_at, Some(now));
    }

    #[tokio::test]
    async fn unknown_target_is_not_found() {
        let sent = sent_campaign().await;
        let now = chrono::Utc::now().naive_utc();
        assert!(sent.repo.mark_read("nope", now).await.unwrap_err().is_not_found());
        assert!(sent.repo.get_target_link("nope").unwrap_err().is_not_found());
        assert_eq!(
            sent.repo.get_target_link(&sent.target_id).unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn inbox_and_demographics_join_campaign_data() {
        let sent = sent_campaign().await;
        let inbox = sent.repo.list_inbox_messages(&sent.customer_id).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].company_name, "Acme Coffee");
        assert_eq!(inbox[0].title, "Spring sale");
        assert!(inbox[0].sent_at.is_some());

        let demographics = sent
            .repo
            .list_targeted_demographics(&[sent.campaign_id.clone()])
            .unwrap();
        assert_eq!(
            demographics,
            vec![AudienceDemographic {
                gender: Gender::F,
                birth_year: 1990
            }]
        );
        assert!(sent.repo.list_target_engagement(&[]).unwrap().is_empty());
    }
}
