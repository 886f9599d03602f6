//! Ledger writes that must run on the writer connection.
//!
//! The writer actor wraps every job in an IMMEDIATE transaction, so the
//! sum read here cannot be invalidated before the insert commits.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel::SqliteConnection;
use log::debug;
use uuid::Uuid;

use geocast_core::wallet::{LedgerEntry, WalletTransaction};
use geocast_core::Result;

use super::model::WalletTransactionDB;
use crate::errors::{not_found_as, StorageError};
use crate::schema::{app_users, wallet_transactions};

#[derive(QueryableByName)]
struct LedgerTotal {
    #[diesel(sql_type = BigInt)]
    total: i64,
}

pub fn ledger_sum(conn: &mut SqliteConnection, user_id: &str) -> Result<i64> {
    let row = diesel::sql_query(
        "SELECT COALESCE(SUM(amount), 0) AS total FROM wallet_transactions WHERE user_id = ?",
    )
    .bind::<Text, _>(user_id)
    .get_result::<LedgerTotal>(conn)
    .map_err(StorageError::from)?;
    Ok(row.total)
}

/// Appends one entry stamped `now` and refreshes the cached balance.
pub fn append_entry(
    conn: &mut SqliteConnection,
    user_id: &str,
    entry: LedgerEntry,
    now: NaiveDateTime,
) -> Result<WalletTransaction> {
    app_users::table
        .find(user_id)
        .select(app_users::id)
        .first::<String>(conn)
        .map_err(not_found_as("User", user_id))?;

    let prior = ledger_sum(conn, user_id)?;
    let new_row = entry.into_transaction(user_id, prior)?;

    let row = WalletTransactionDB {
        id: Uuid::now_v7().to_string(),
        user_id: new_row.user_id,
        transaction_type: new_row.transaction_type.as_str().to_string(),
        amount: new_row.amount,
        balance_after: new_row.balance_after,
        metadata: serde_json::to_string(&new_row.metadata).map_err(StorageError::from)?,
        created_at: now,
    };
    let saved = diesel::insert_into(wallet_transactions::table)
        .values(&row)
        .returning(WalletTransactionDB::as_returning())
        .get_result(conn)
        .map_err(StorageError::from)?;

    diesel::update(app_users::table.find(user_id))
        .set(app_users::points.eq(saved.balance_after))
        .execute(conn)
        .map_err(StorageError::from)?;

    debug!(
        "Ledger {} for user {}: {} -> {}",
        saved.transaction_type, user_id, prior, saved.balance_after
    );
    WalletTransaction::try_from(saved)
}
