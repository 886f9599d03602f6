//! Wallet ledger models and the pure rules for building ledger rows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::CAMPAIGN_ID_METADATA_KEY;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Charge,
    DebitCampaign,
    Refund,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Charge => "CHARGE",
            TransactionType::DebitCampaign => "DEBIT_CAMPAIGN",
            TransactionType::Refund => "REFUND",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CHARGE" => Some(TransactionType::Charge),
            "DEBIT_CAMPAIGN" => Some(TransactionType::DebitCampaign),
            "REFUND" => Some(TransactionType::Refund),
            _ => None,
        }
    }
}

/// Domain model representing one ledger row. Rows are never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub balance_after: i64,
    pub metadata: Value,
    pub created_at: NaiveDateTime,
}

/// A ledger row ready to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWalletTransaction {
    pub user_id: String,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub balance_after: i64,
    pub metadata: Value,
}

/// A requested mutation of a user's ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    Charge { amount: i64, metadata: Value },
    CampaignDebit { amount: i64, campaign_id: String },
}

impl LedgerEntry {
    pub fn charge(amount: i64, metadata: Value) -> Result<Self> {
        let metadata = match metadata {
            Value::Null => json!({}),
            Value::Object(_) => metadata,
            _ => return Err(Error::invalid_input("metadata must be an object")),
        };
        let entry = LedgerEntry::Charge { amount, metadata };
        entry.validate()?;
        Ok(entry)
    }

    pub fn campaign_debit(amount: i64, campaign_id: impl Into<String>) -> Result<Self> {
        let entry = LedgerEntry::CampaignDebit {
            amount,
            campaign_id: campaign_id.into(),
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn amount(&self) -> i64 {
        match self {
            LedgerEntry::Charge { amount, .. } | LedgerEntry::CampaignDebit { amount, .. } => {
                *amount
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount() <= 0 {
            return Err(Error::invalid_input("Amount must be positive"));
        }
        Ok(())
    }

    /// Builds the row given the authoritative balance before this entry.
    ///
    /// Debits that exceed `prior_balance` fail with `InsufficientFunds`.
    pub fn into_transaction(
        self,
        user_id: &str,
        prior_balance: i64,
    ) -> Result<NewWalletTransaction> {
        self.validate()?;
        match self {
            LedgerEntry::Charge { amount, metadata } => {
                let balance_after = prior_balance
                    .checked_add(amount)
                    .ok_or_else(|| Error::invalid_input("Charge overflows the balance"))?;
                Ok(NewWalletTransaction {
                    user_id: user_id.to_string(),
                    transaction_type: TransactionType::Charge,
                    amount,
                    balance_after,
                    metadata,
                })
            }
            LedgerEntry::CampaignDebit {
                amount,
                campaign_id,
            } => {
                if prior_balance < amount {
                    return Err(Error::InsufficientFunds {
                        required: amount,
                        available: prior_balance,
                    });
                }
                Ok(NewWalletTransaction {
                    user_id: user_id.to_string(),
                    transaction_type: TransactionType::DebitCampaign,
                    amount: -amount,
                    balance_after: prior_balance - amount,
                    metadata: json!({ CAMPAIGN_ID_METADATA_KEY: campaign_id }),
                })
            }
        }
    }
}

/// The three balance figures kept for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// SUM(amount) over every row. Authoritative.
    pub ledger_sum: i64,
    /// `balance_after` of the newest row, if any.
    pub last_balance_after: Option<i64>,
    /// Cached `points` on the user record.
    pub cached_points: i64,
}

impl LedgerSnapshot {
    pub fn has_drift(&self) -> bool {
        self.cached_points != self.ledger_sum
            || self
                .last_balance_after
                .is_some_and(|last| last != self.ledger_sum)
    }
}
