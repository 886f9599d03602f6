//! Wallet ledger - append-only points ledger per user.

mod wallet_model;
mod wallet_service;
mod wallet_traits;

#[cfg(test)]
mod wallet_service_tests;

pub use wallet_model::{
    LedgerEntry, LedgerSnapshot, NewWalletTransaction, TransactionType, WalletTransaction,
};
pub use wallet_service::WalletService;
pub use wallet_traits::{WalletRepositoryTrait, WalletServiceTrait};
