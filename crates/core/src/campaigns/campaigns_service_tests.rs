#[cfg(test)]
mod tests {
    use crate::campaigns::{
        Campaign, CampaignDraft, CampaignRepositoryTrait, CampaignService, CampaignServiceTrait,
        CampaignStatus, CampaignTarget, DeliveryReport, DeliveryStatus, NewCampaign, SendReceipt,
        SendRequest,
    };
    use crate::customers::{
        AudienceMember, Customer, CustomerServiceTrait, CustomerUpdate, Gender, NewCustomer,
    };
    use crate::errors::{Error, Result};
    use crate::filters::{AudienceQuery, FilterSpec};
    use crate::notifications::{NewNotification, Notification, NotificationServiceTrait};
    use crate::users::{UserIdentity, UserRole};
    use crate::utils::{time_utils, FixedClock, Page, PageRequest, ReportingCalendar};
    use crate::wallet::{LedgerEntry, WalletTransaction};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    // --- Mock CustomerService ---
    struct MockCustomerService {
        customers: Arc<Mutex<Vec<Customer>>>,
    }

    #[async_trait]
    impl CustomerServiceTrait for MockCustomerService {
        fn count_matching(&self, query: &AudienceQuery) -> Result<i64> {
            Ok(self.list_matching(query)?.len() as i64)
        }

        fn list_matching(&self, query: &AudienceQuery) -> Result<Vec<Customer>> {
            Ok(self
                .customers
                .lock()
                .unwrap()
                .iter()
                .filter(|c| query.matches(c))
                .cloned()
                .collect())
        }

        fn list_page(&self, _query: &AudienceQuery, _page: PageRequest) -> Result<Page<Customer>> {
            unimplemented!()
        }

        fn browse_audience(
            &self,
            _filters: &FilterSpec,
            _page: PageRequest,
        ) -> Result<Page<AudienceMember>> {
            unimplemented!()
        }

        fn get_customer(&self, _actor: &UserIdentity, _customer_id: &str) -> Result<Customer> {
            unimplemented!()
        }

        fn list_customers(
            &self,
            _actor: &UserIdentity,
            _filters: &FilterSpec,
            _page: PageRequest,
        ) -> Result<Page<Customer>> {
            unimplemented!()
        }

        async fn create_customer(
            &self,
            _actor: &UserIdentity,
            _new_customer: NewCustomer,
        ) -> Result<Customer> {
            unimplemented!()
        }

        async fn update_customer(
            &self,
            _actor: &UserIdentity,
            _customer_update: CustomerUpdate,
        ) -> Result<Customer> {
            unimplemented!()
        }

        async fn delete_customer(&self, _actor: &UserIdentity, _customer_id: &str) -> Result<()> {
            unimplemented!()
        }
    }

    // --- Mock NotificationService ---
    #[derive(Default)]
    struct MockNotifications {
        sent: Mutex<Vec<NewNotification>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationServiceTrait for MockNotifications {
        async fn enqueue(&self, notification: NewNotification) -> Result<Notification> {
            if self.fail {
                return Err(Error::Unexpected("outbox down".to_string()));
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(Notification {
                id: "n1".to_string(),
                user_id: notification.user_id,
                campaign_id: notification.campaign_id,
                text: notification.text,
                link: notification.link,
                from_admin: notification.from_admin,
                created_at: NaiveDateTime::default(),
            })
        }

        fn list_for_user(&self, _user_id: &str) -> Result<Vec<Notification>> {
            Ok(Vec::new())
        }
    }

    // --- Mock CampaignRepository with an in-memory wallet ---
    struct MockCampaignRepository {
        customers: Arc<Mutex<Vec<Customer>>>,
        campaigns: Mutex<Vec<Campaign>>,
        targets: Mutex<Vec<CampaignTarget>>,
        ledger: Mutex<Vec<i64>>,
    }

    impl MockCampaignRepository {
        fn balance(&self) -> i64 {
            self.ledger.lock().unwrap().iter().sum()
        }
    }

    #[async_trait]
    impl CampaignRepositoryTrait for MockCampaignRepository {
        async fn create(&self, draft: CampaignDraft) -> Result<Campaign> {
            let mut campaigns = self.campaigns.lock().unwrap();
            let campaign = Campaign {
                id: format!("camp{}", campaigns.len() + 1),
                user_id: draft.user_id,
                title: draft.title,
                message_text: draft.message_text,
                link: draft.link,
                filters: draft.filters,
                price_per_recipient: draft.price_per_recipient,
                estimated_cost: draft.estimated_cost,
                final_cost: None,
                recipients_count: draft.recipients_count,
                status: CampaignStatus::Draft,
                created_at: draft.created_at,
            };
            campaigns.push(campaign.clone());
            Ok(campaign)
        }

        fn get_by_id(&self, campaign_id: &str) -> Result<Campaign> {
            self.campaigns
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == campaign_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(campaign_id.to_string()))
        }

        fn list_by_user(&self, user_id: &str) -> Result<Vec<Campaign>> {
            Ok(self
                .campaigns
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect())
        }

        fn list_by_status(&self, status: CampaignStatus) -> Result<Vec<Campaign>> {
            Ok(self
                .campaigns
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.status == status)
                .cloned()
                .collect())
        }

        fn list_targets(&self, campaign_id: &str) -> Result<Vec<CampaignTarget>> {
            Ok(self
                .targets
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.campaign_id == campaign_id)
                .cloned()
                .collect())
        }

        async fn commit_send(&self, request: SendRequest) -> Result<SendReceipt> {
            let mut campaign = self.get_by_id(&request.campaign_id)?;
            campaign.ensure_sendable_by(&request.actor_id)?;

            let debit = LedgerEntry::campaign_debit(campaign.estimated_cost, &campaign.id)?
                .into_transaction(&campaign.user_id, self.balance())?;
            self.ledger.lock().unwrap().push(debit.amount);

            let query = campaign.filters.resolve(request.reference_year).query;
            let matched: Vec<Customer> = self
                .customers
                .lock()
                .unwrap()
                .iter()
                .filter(|c| query.matches(c))
                .cloned()
                .collect();
            let mut targets = self.targets.lock().unwrap();
            for customer in &matched {
                let id = format!("t{}", targets.len() + 1);
                targets.push(CampaignTarget {
                    id,
                    campaign_id: campaign.id.clone(),
                    customer_id: customer.id.clone(),
                    delivery_status: DeliveryStatus::Pending,
                    sent_at: None,
                    read_at: None,
                    click_at: None,
                });
            }

            campaign.status = CampaignStatus::Sending;
            campaign.final_cost = Some(campaign.estimated_cost);
            for slot in self.campaigns.lock().unwrap().iter_mut() {
                if slot.id == campaign.id {
                    *slot = campaign.clone();
                }
            }
            Ok(SendReceipt {
                campaign,
                targets_created: matched.len() as i64,
                debit: Some(WalletTransaction {
                    id: "tx".to_string(),
                    user_id: debit.user_id,
                    transaction_type: debit.transaction_type,
                    amount: debit.amount,
                    balance_after: debit.balance_after,
                    metadata: debit.metadata,
                    created_at: request.now,
                }),
            })
        }

        async fn complete_delivery(
            &self,
            campaign_id: &str,
            now: NaiveDateTime,
        ) -> Result<DeliveryReport> {
            let mut delivered_now = 0;
            let mut delivered_total = 0;
            for t in self
                .targets
                .lock()
                .unwrap()
                .iter_mut()
                .filter(|t| t.campaign_id == campaign_id)
            {
                if t.delivery_status == DeliveryStatus::Pending {
                    t.delivery_status = DeliveryStatus::Delivered;
                    t.sent_at = Some(now);
                    delivered_now += 1;
                }
                if t.delivery_status == DeliveryStatus::Delivered {
                    delivered_total += 1;
                }
            }
            let mut campaigns = self.campaigns.lock().unwrap();
            let campaign = campaigns
                .iter_mut()
                .find(|c| c.id == campaign_id)
                .ok_or_else(|| Error::NotFound(campaign_id.to_string()))?;
            let transitioned = campaign.status == CampaignStatus::Sending;
            if transitioned {
                campaign.status = CampaignStatus::after_delivery(delivered_total, 0);
            }
            Ok(DeliveryReport {
                campaign: campaign.clone(),
                delivered_now,
                delivered_total,
                failed_total: 0,
                transitioned,
            })
        }
    }

    // --- Fixture ---
    struct Fixture {
        service: CampaignService,
        repo: Arc<MockCampaignRepository>,
        customers: Arc<Mutex<Vec<Customer>>>,
        notifications: Arc<MockNotifications>,
    }

    fn customer(id: usize, gender: Gender, sido: &str) -> Customer {
        Customer {
            id: format!("cust{}", id),
            name: "Lee".to_string(),
            gender,
            birth_year: 1990,
            phone: None,
            road_address: None,
            detail_address: None,
            postal_code: None,
            sido: Some(sido.to_string()),
            sigungu: None,
            lat: 37.5,
            lng: 127.0,
            created_at: NaiveDateTime::default(),
        }
    }

    /// Ten customers, five of them female in Seoul.
    fn fixture_with(balance: i64, notifications: MockNotifications) -> Fixture {
        let mut base = Vec::new();
        for i in 0..5 {
            base.push(customer(i, Gender::F, "Seoul"));
        }
        for i in 5..8 {
            base.push(customer(i, Gender::M, "Seoul"));
        }
        for i in 8..10 {
            base.push(customer(i, Gender::F, "Busan"));
        }
        let customers = Arc::new(Mutex::new(base));
        let repo = Arc::new(MockCampaignRepository {
            customers: customers.clone(),
            campaigns: Mutex::new(Vec::new()),
            targets: Mutex::new(Vec::new()),
            ledger: Mutex::new(vec![balance]),
        });
        let notifications = Arc::new(notifications);
        let now = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        let calendar = ReportingCalendar::new(
            Arc::new(FixedClock::new(now)),
            time_utils::DEFAULT_REPORTING_TZ,
            None,
        );
        let service = CampaignService::new(
            repo.clone(),
            Arc::new(MockCustomerService {
                customers: customers.clone(),
            }),
            notifications.clone(),
            calendar,
        );
        Fixture {
            service,
            repo,
            customers,
            notifications,
        }
    }

    fn owner() -> UserIdentity {
        UserIdentity {
            user_id: "owner".to_string(),
            email: "owner@geocast.io".to_string(),
            role: UserRole::User,
        }
    }

    fn seoul_women() -> serde_json::Value {
        json!({
            "gender": {"enabled": true, "value": "F"},
            "region": {"enabled": true, "value": {"sido": "Seoul"}}
        })
    }

    fn new_campaign() -> NewCampaign {
        NewCampaign {
            title: "Summer sale".to_string(),
            message_text: "Visit us".to_string(),
            link: Some("https://example.com".to_string()),
            filters: seoul_women(),
        }
    }

    #[test]
    fn preview_prices_by_active_filters() {
        let f = fixture_with(0, MockNotifications::default());
        let quote = f.service.preview(&seoul_women()).unwrap();
        assert_eq!(quote.recipients, 5);
        assert_eq!(quote.active_filter_count, 2);
        assert_eq!(quote.unit_price, 110);
        assert_eq!(quote.estimated_cost, 550);
    }

    #[tokio::test]
    async fn create_snapshots_the_preview() {
        let f = fixture_with(0, MockNotifications::default());
        let quote = f.service.preview(&seoul_women()).unwrap();
        let campaign = f
            .service
            .create_campaign(&owner(), new_campaign())
            .await
            .unwrap();
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert_eq!(campaign.recipients_count, quote.recipients);
        assert_eq!(campaign.estimated_cost, quote.estimated_cost);

        // Later growth of the customer base does not reprice the campaign.
        f.customers
            .lock()
            .unwrap()
            .push(customer(99, Gender::F, "Seoul"));
        let stored = f.service.get_campaign(&campaign.id, &owner()).unwrap();
        assert_eq!(stored.estimated_cost, 550);
    }

    #[tokio::test]
    async fn timestamps_come_from_the_service_clock() {
        let f = fixture_with(1000, MockNotifications::default());
        let pinned = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        let campaign = f
            .service
            .create_campaign(&owner(), new_campaign())
            .await
            .unwrap();
        assert_eq!(campaign.created_at, pinned);

        let receipt = f
            .repo
            .commit_send(SendRequest {
                campaign_id: campaign.id.clone(),
                actor_id: "owner".to_string(),
                reference_year: 2024,
                now: pinned,
            })
            .await
            .unwrap();
        assert_eq!(receipt.debit.unwrap().created_at, pinned);
    }

    #[tokio::test]
    async fn send_debits_materializes_and_completes() {
        let f = fixture_with(1000, MockNotifications::default());
        let campaign = f
            .service
            .create_campaign(&owner(), new_campaign())
            .await
            .unwrap();

        let outcome = f.service.send_campaign(&campaign.id, &owner()).await.unwrap();
        assert_eq!(outcome.targets_created, 5);
        assert_eq!(outcome.charged, 550);
        assert_eq!(outcome.balance_after, Some(450));
        assert_eq!(outcome.campaign.status, CampaignStatus::Completed);
        assert_eq!(outcome.campaign.final_cost, Some(550));
        assert_eq!(f.repo.balance(), 450);

        let targets = f.repo.list_targets(&campaign.id).unwrap();
        assert_eq!(targets.len(), 5);
        assert!(targets
            .iter()
            .all(|t| t.delivery_status == DeliveryStatus::Delivered && t.sent_at.is_some()));

        let sent = f.notifications.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("5 recipients"));
    }

    #[tokio::test]
    async fn send_with_insufficient_funds_changes_nothing() {
        let f = fixture_with(100, MockNotifications::default());
        let campaign = f
            .service
            .create_campaign(&owner(), new_campaign())
            .await
            .unwrap();

        let err = f
            .service
            .send_campaign(&campaign.id, &owner())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientFunds { .. }));
        let stored = f.repo.get_by_id(&campaign.id).unwrap();
        assert_eq!(stored.status, CampaignStatus::Draft);
        assert!(f.repo.list_targets(&campaign.id).unwrap().is_empty());
        assert_eq!(f.repo.balance(), 100);
    }

    #[tokio::test]
    async fn send_guards() {
        let f = fixture_with(5000, MockNotifications::default());
        let campaign = f
            .service
            .create_campaign(&owner(), new_campaign())
            .await
            .unwrap();

        let intruder = UserIdentity {
            user_id: "intruder".to_string(),
            email: "x@y.z".to_string(),
            role: UserRole::User,
        };
        assert!(matches!(
            f.service.send_campaign(&campaign.id, &intruder).await,
            Err(Error::PermissionDenied(_))
        ));

        f.service.send_campaign(&campaign.id, &owner()).await.unwrap();
        assert!(matches!(
            f.service.send_campaign(&campaign.id, &owner()).await,
            Err(Error::InvalidState(_))
        ));
        assert_eq!(f.repo.balance(), 5000 - 550);
    }

    #[tokio::test]
    async fn deliver_rejects_drafts_and_is_idempotent() {
        let f = fixture_with(1000, MockNotifications::default());
        let campaign = f
            .service
            .create_campaign(&owner(), new_campaign())
            .await
            .unwrap();
        assert!(matches!(
            f.service.deliver(&campaign.id).await,
            Err(Error::InvalidState(_))
        ));

        f.service.send_campaign(&campaign.id, &owner()).await.unwrap();
        let again = f.service.deliver(&campaign.id).await.unwrap();
        assert!(!again.transitioned);
        assert_eq!(again.delivered_now, 0);
        assert_eq!(f.notifications.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_notification_does_not_fail_send() {
        let f = fixture_with(
            1000,
            MockNotifications {
                fail: true,
                ..Default::default()
            },
        );
        let campaign = f
            .service
            .create_campaign(&owner(), new_campaign())
            .await
            .unwrap();
        let outcome = f.service.send_campaign(&campaign.id, &owner()).await.unwrap();
        assert_eq!(outcome.campaign.status, CampaignStatus::Completed);
    }

    #[tokio::test]
    async fn get_campaign_requires_owner_or_admin() {
        let f = fixture_with(0, MockNotifications::default());
        let campaign = f
            .service
            .create_campaign(&owner(), new_campaign())
            .await
            .unwrap();
        let stranger = UserIdentity {
            user_id: "other".to_string(),
            email: "o@x.io".to_string(),
            role: UserRole::User,
        };
        assert!(matches!(
            f.service.get_campaign(&campaign.id, &stranger),
            Err(Error::PermissionDenied(_))
        ));
        let admin = UserIdentity {
            role: UserRole::Admin,
            ..stranger
        };
        assert!(f.service.get_campaign(&campaign.id, &admin).is_ok());
    }

    #[tokio::test]
    async fn create_rejects_invalid_filters() {
        let f = fixture_with(0, MockNotifications::default());
        let mut bad = new_campaign();
        bad.filters = json!({"ageRange": {"enabled": true, "value": [50, 10]}});
        assert!(matches!(
            f.service.create_campaign(&owner(), bad).await,
            Err(Error::Validation(_))
        ));
    }
}
