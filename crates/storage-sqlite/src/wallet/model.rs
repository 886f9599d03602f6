//! Database model for ledger rows.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde_json::Value;

use geocast_core::wallet::{TransactionType, WalletTransaction};
use geocast_core::{Error, Result};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::wallet_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletTransactionDB {
    pub id: String,
    pub user_id: String,
    pub transaction_type: String,
    pub amount: i64,
    pub balance_after: i64,
    pub metadata: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<WalletTransactionDB> for WalletTransaction {
    type Error = Error;

    fn try_from(db: WalletTransactionDB) -> Result<Self> {
        let transaction_type = TransactionType::parse(&db.transaction_type).ok_or_else(|| {
            Error::Unexpected(format!(
                "Unknown transaction type '{}' on {}",
                db.transaction_type, db.id
            ))
        })?;
        let metadata = if db.metadata.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&db.metadata)?
        };
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            transaction_type,
            amount: db.amount,
            balance_after: db.balance_after,
            metadata,
            created_at: db.created_at,
        })
    }
}
