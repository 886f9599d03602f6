use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;

use super::wallet_model::{LedgerEntry, LedgerSnapshot, WalletTransaction};
use crate::errors::Result;
use crate::utils::{Page, PageRequest};

/// Trait for wallet ledger persistence.
///
/// `append` must read the ledger sum, build the row with
/// [`LedgerEntry::into_transaction`], insert it and update the cached
/// balance as one serialized unit of work per user. The row is stamped
/// with `now`.
#[async_trait]
pub trait WalletRepositoryTrait: Send + Sync {
    async fn append(
        &self,
        user_id: &str,
        entry: LedgerEntry,
        now: NaiveDateTime,
    ) -> Result<WalletTransaction>;
    fn snapshot(&self, user_id: &str) -> Result<LedgerSnapshot>;
    /// Rewrites the cached balance from the ledger sum. Returns the sum.
    async fn reconcile_cached_balance(&self, user_id: &str) -> Result<i64>;
    fn list_transactions(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> Result<Page<WalletTransaction>>;
}

/// Trait for wallet service operations
#[async_trait]
pub trait WalletServiceTrait: Send + Sync {
    async fn charge(&self, user_id: &str, amount: i64, metadata: Value)
        -> Result<WalletTransaction>;
    async fn debit_for_campaign(
        &self,
        user_id: &str,
        amount: i64,
        campaign_id: &str,
    ) -> Result<WalletTransaction>;
    /// Ledger-derived balance. Repairs a drifted cache as a side effect.
    async fn get_current_balance(&self, user_id: &str) -> Result<i64>;
    fn list_transactions(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> Result<Page<WalletTransaction>>;
}
