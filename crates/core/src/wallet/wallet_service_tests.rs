#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::utils::{Clock, FixedClock, Page, PageRequest};
    use crate::wallet::{
        LedgerEntry, LedgerSnapshot, WalletRepositoryTrait, WalletService, WalletServiceTrait,
        WalletTransaction,
    };
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockWalletRepository {
        rows: Mutex<Vec<WalletTransaction>>,
        cached_points: Mutex<i64>,
        reconcile_calls: Mutex<usize>,
    }

    #[async_trait]
    impl WalletRepositoryTrait for MockWalletRepository {
        async fn append(
            &self,
            user_id: &str,
            entry: LedgerEntry,
            now: NaiveDateTime,
        ) -> Result<WalletTransaction> {
            let mut rows = self.rows.lock().unwrap();
            let prior: i64 = rows.iter().map(|r| r.amount).sum();
            let new_tx = entry.into_transaction(user_id, prior)?;
            let tx = WalletTransaction {
                id: format!("tx{}", rows.len() + 1),
                user_id: new_tx.user_id,
                transaction_type: new_tx.transaction_type,
                amount: new_tx.amount,
                balance_after: new_tx.balance_after,
                metadata: new_tx.metadata,
                created_at: now,
            };
            rows.push(tx.clone());
            *self.cached_points.lock().unwrap() = tx.balance_after;
            Ok(tx)
        }

        fn snapshot(&self, _user_id: &str) -> Result<LedgerSnapshot> {
            let rows = self.rows.lock().unwrap();
            Ok(LedgerSnapshot {
                ledger_sum: rows.iter().map(|r| r.amount).sum(),
                last_balance_after: rows.last().map(|r| r.balance_after),
                cached_points: *self.cached_points.lock().unwrap(),
            })
        }

        async fn reconcile_cached_balance(&self, _user_id: &str) -> Result<i64> {
            *self.reconcile_calls.lock().unwrap() += 1;
            let sum: i64 = self.rows.lock().unwrap().iter().map(|r| r.amount).sum();
            *self.cached_points.lock().unwrap() = sum;
            Ok(sum)
        }

        fn list_transactions(
            &self,
            _user_id: &str,
            page: PageRequest,
        ) -> Result<Page<WalletTransaction>> {
            let mut rows = self.rows.lock().unwrap().clone();
            rows.reverse();
            Ok(Page::from_full(rows, page))
        }
    }

    fn pinned_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(pinned_now()))
    }

    #[tokio::test]
    async fn charge_then_debit_keeps_running_balance() {
        let repo = Arc::new(MockWalletRepository::default());
        let service = WalletService::new(repo.clone(), clock());

        let charge = service
            .charge("u1", 1000, json!({"method": "card"}))
            .await
            .unwrap();
        assert_eq!(charge.balance_after, 1000);

        let debit = service.debit_for_campaign("u1", 550, "c1").await.unwrap();
        assert_eq!(debit.amount, -550);
        assert_eq!(debit.balance_after, 450);
        assert_eq!(service.get_current_balance("u1").await.unwrap(), 450);
        assert_eq!(*repo.reconcile_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn ledger_rows_are_stamped_by_the_clock() {
        let service = WalletService::new(Arc::new(MockWalletRepository::default()), clock());
        let charge = service.charge("u1", 500, json!({})).await.unwrap();
        let debit = service.debit_for_campaign("u1", 200, "c1").await.unwrap();
        assert_eq!(charge.created_at, pinned_now());
        assert_eq!(debit.created_at, pinned_now());
    }

    #[tokio::test]
    async fn insufficient_funds_leaves_ledger_untouched() {
        let repo = Arc::new(MockWalletRepository::default());
        let service = WalletService::new(repo.clone(), clock());
        service.charge("u1", 100, json!({})).await.unwrap();

        let err = service
            .debit_for_campaign("u1", 550, "c1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientFunds {
                required: 550,
                available: 100
            }
        ));
        assert_eq!(repo.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn drifted_cache_is_repaired_but_ledger_sum_is_returned() {
        let repo = Arc::new(MockWalletRepository::default());
        let service = WalletService::new(repo.clone(), clock());
        service.charge("u1", 300, json!({})).await.unwrap();
        *repo.cached_points.lock().unwrap() = 9999;

        assert_eq!(service.get_current_balance("u1").await.unwrap(), 300);
        assert_eq!(*repo.reconcile_calls.lock().unwrap(), 1);
        assert_eq!(*repo.cached_points.lock().unwrap(), 300);
    }

    #[tokio::test]
    async fn rejects_non_positive_charge() {
        let service = WalletService::new(Arc::new(MockWalletRepository::default()), clock());
        let err = service.charge("u1", 0, json!({})).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let service = WalletService::new(Arc::new(MockWalletRepository::default()), clock());
        service.charge("u1", 100, json!({})).await.unwrap();
        service.charge("u1", 200, json!({})).await.unwrap();
        let page = service
            .list_transactions("u1", PageRequest::default())
            .unwrap();
        assert_eq!(page.items[0].amount, 200);
        assert_eq!(page.total_elements, 2);
    }
}
