use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use serde_json::Value;

use super::wallet_model::{LedgerEntry, WalletTransaction};
use super::wallet_traits::{WalletRepositoryTrait, WalletServiceTrait};
use crate::errors::Result;
use crate::utils::{Clock, Page, PageRequest};

/// Service for charging and debiting user wallets
pub struct WalletService {
    repository: Arc<dyn WalletRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl WalletService {
    pub fn new(repository: Arc<dyn WalletRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl WalletServiceTrait for WalletService {
    async fn charge(
        &self,
        user_id: &str,
        amount: i64,
        metadata: Value,
    ) -> Result<WalletTransaction> {
        let entry = LedgerEntry::charge(amount, metadata)?;
        let tx = self.repository.append(user_id, entry, self.clock.now()).await?;
        info!(
            "wallet charge user_id={} amount={} balance_after={}",
            user_id, amount, tx.balance_after
        );
        Ok(tx)
    }

    async fn debit_for_campaign(
        &self,
        user_id: &str,
        amount: i64,
        campaign_id: &str,
    ) -> Result<WalletTransaction> {
        let entry = LedgerEntry::campaign_debit(amount, campaign_id)?;
        let tx = self.repository.append(user_id, entry, self.clock.now()).await?;
        info!(
            "wallet debit user_id={} campaign_id={} amount={} balance_after={}",
            user_id, campaign_id, amount, tx.balance_after
        );
        Ok(tx)
    }

    async fn get_current_balance(&self, user_id: &str) -> Result<i64> {
        let snapshot = self.repository.snapshot(user_id)?;
        if snapshot.has_drift() {
            warn!(
                "wallet drift user_id={} ledger_sum={} last_balance_after={:?} cached_points={}",
                user_id, snapshot.ledger_sum, snapshot.last_balance_after, snapshot.cached_points
            );
            if let Err(e) = self.repository.reconcile_cached_balance(user_id).await {
                warn!("wallet reconciliation failed user_id={}: {}", user_id, e);
            }
        }
        Ok(snapshot.ledger_sum)
    }

    fn list_transactions(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> Result<Page<WalletTransaction>> {
        self.repository.list_transactions(user_id, page)
    }
}
