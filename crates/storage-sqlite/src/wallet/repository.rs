use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use geocast_core::utils::{Page, PageRequest};
use geocast_core::wallet::{LedgerEntry, LedgerSnapshot, WalletRepositoryTrait, WalletTransaction};
use geocast_core::Result;

use super::ledger::{append_entry, ledger_sum};
use super::model::WalletTransactionDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{app_users, wallet_transactions};

pub struct WalletRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl WalletRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl WalletRepositoryTrait for WalletRepository {
    async fn append(
        &self,
        user_id: &str,
        entry: LedgerEntry,
        now: NaiveDateTime,
    ) -> Result<WalletTransaction> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| append_entry(conn, &user_id, entry, now))
            .await
    }

    fn snapshot(&self, user_id: &str) -> Result<LedgerSnapshot> {
        let mut conn = get_connection(&self.pool)?;
        let cached_points = app_users::table
            .find(user_id)
            .select(app_users::points)
            .first::<i64>(&mut conn)
            .map_err(not_found_as("User", user_id))?;
        let ledger_sum = ledger_sum(&mut conn, user_id)?;
        let last_balance_after = wallet_transactions::table
            .filter(wallet_transactions::user_id.eq(user_id))
            .order((
                wallet_transactions::created_at.desc(),
                wallet_transactions::id.desc(),
            ))
            .select(wallet_transactions::balance_after)
            .first::<i64>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(LedgerSnapshot {
            ledger_sum,
            last_balance_after,
            cached_points,
        })
    }

    async fn reconcile_cached_balance(&self, user_id: &str) -> Result<i64> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<i64> {
                let total = ledger_sum(conn, &user_id)?;
                let updated = diesel::update(app_users::table.find(&user_id))
                    .set(app_users::points.eq(total))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(geocast_core::Error::NotFound(format!(
                        "User {} not found",
                        user_id
                    )));
                }
                Ok(total)
            })
            .await
    }

    fn list_transactions(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> Result<Page<WalletTransaction>> {
        let mut conn = get_connection(&self.pool)?;
        let total = wallet_transactions::table
            .filter(wallet_transactions::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        let rows = wallet_transactions::table
            .filter(wallet_transactions::user_id.eq(user_id))
            .order((
                wallet_transactions::created_at.desc(),
                wallet_transactions::id.desc(),
            ))
            .limit(page.size)
            .offset(page.offset())
            .select(WalletTransactionDB::as_select())
            .load::<WalletTransactionDB>(&mut conn)
            .map_err(StorageError::from)?;
        let items = rows
            .into_iter()
            .map(WalletTransaction::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total, page))
    }
}
