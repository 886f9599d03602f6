//! SQLite storage implementation for the wallet ledger.

mod ledger;
mod model;
mod repository;

pub use ledger::{append_entry, ledger_sum};
pub use model::WalletTransactionDB;
pub use repository::WalletRepository;
