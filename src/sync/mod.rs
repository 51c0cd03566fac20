//! Read-then-render refresh cycles
//!
//! - **AccountSync**: reloads the user's accounts and re-projects the card
//!   grid and the four account selectors
//! - **TransactionSync**: reloads the transaction table for the account
//!   picked in the filter

mod accounts;
mod transactions;

pub use accounts::{AccountSync, LOAD_ACCOUNTS_FAILED};
pub use transactions::{TransactionSync, LOAD_TRANSACTIONS_FAILED};

/// Result of one refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The response was rendered; carries the number of items
    Applied(usize),
    /// A newer refresh had already rendered, this response was dropped
    Superseded,
    /// Nothing to fetch (no account selected)
    Cleared,
}
