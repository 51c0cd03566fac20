//! Transaction Sync

use super::SyncOutcome;
use crate::api::BankClient;
use crate::error::ClientResult;
use crate::notify::{Notification, Notifier};
use crate::state::AppState;
use std::sync::Arc;

pub const LOAD_TRANSACTIONS_FAILED: &str = "Error loading transactions";

/// Reloads the transaction table for the selected account
#[derive(Clone)]
pub struct TransactionSync {
    client: BankClient,
    state: AppState,
    notifier: Arc<dyn Notifier>,
}

impl TransactionSync {
    pub fn new(client: BankClient, state: AppState, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            state,
            notifier,
        }
    }

    /// Fetch transactions of one account and replace the table.
    ///
    /// `None` or an empty account number is the filter's empty option: the
    /// table goes back to its prompt without touching the network. Any other
    /// value is sent as given.
    pub async fn refresh_transactions(&self, account_number: Option<&str>) -> ClientResult<SyncOutcome> {
        let ticket = self.state.next_transaction_ticket();

        let account_number = match account_number {
            Some(n) if !n.is_empty() => n,
            _ => {
                self.state.clear_transactions(ticket).await;
                return Ok(SyncOutcome::Cleared);
            }
        };

        tracing::debug!(account = %account_number, ticket, "Refreshing transactions");

        let transactions = match self.client.account_transactions(account_number).await {
            Ok(transactions) => transactions,
            Err(e) => {
                if self.state.transaction_ticket_superseded(ticket).await {
                    tracing::debug!(account = %account_number, ticket, error = %e, "Dropping superseded transaction failure");
                    return Ok(SyncOutcome::Superseded);
                }
                tracing::debug!(account = %account_number, error = %e, "Error loading transactions");
                let message = e
                    .backend_message()
                    .unwrap_or(LOAD_TRANSACTIONS_FAILED)
                    .to_string();
                self.notifier.notify(Notification::danger(message));
                return Err(e);
            }
        };

        let count = transactions.len();
        if self
            .state
            .apply_transactions(ticket, account_number, &transactions)
            .await
        {
            tracing::info!(account = %account_number, transactions = count, "Transactions refreshed");
            Ok(SyncOutcome::Applied(count))
        } else {
            tracing::debug!(account = %account_number, ticket, "Dropping superseded transaction refresh");
            Ok(SyncOutcome::Superseded)
        }
    }
}
