//! Application State
//!
//! Shared, cloneable handle to the dashboard's in-memory state. Account
//! Sync is the only writer of the account list and Transaction Sync the
//! only writer of the transaction table; both go through ticketed
//! refreshes so that a late response never overwrites a newer one.

use crate::models::{Account, Session, Transaction};
use crate::view::{project_selectors, AccountsView, DashboardView, TransactionsView};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Identifies one refresh request
pub type Ticket = u64;

#[derive(Debug, Default)]
struct Inner {
    session: Option<Session>,
    accounts: Vec<Account>,
    selected_account: Option<String>,
    view: DashboardView,
    accounts_applied: Ticket,
    transactions_applied: Ticket,
}

/// Shared application state for all components
#[derive(Clone, Default)]
pub struct AppState {
    inner: Arc<RwLock<Inner>>,
    account_tickets: Arc<AtomicU64>,
    transaction_tickets: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the logged-in user
    pub async fn set_session(&self, session: Session) {
        let mut inner = self.inner.write().await;
        inner.view.user_display = Some(session.username.clone());
        inner.session = Some(session);
    }

    pub async fn session(&self) -> Option<Session> {
        self.inner.read().await.session.clone()
    }

    /// Drop everything user-specific
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.session = None;
        inner.accounts.clear();
        inner.selected_account = None;
        inner.view = DashboardView::default();
        // Anything still in flight belongs to the previous user
        inner.accounts_applied = self.account_tickets.load(Ordering::SeqCst);
        inner.transactions_applied = self.transaction_tickets.load(Ordering::SeqCst);
    }

    /// Current cached account list
    pub async fn accounts(&self) -> Vec<Account> {
        self.inner.read().await.accounts.clone()
    }

    pub async fn selected_account(&self) -> Option<String> {
        self.inner.read().await.selected_account.clone()
    }

    /// Snapshot of what the dashboard displays
    pub async fn view(&self) -> DashboardView {
        self.inner.read().await.view.clone()
    }

    pub(crate) fn next_account_ticket(&self) -> Ticket {
        self.account_tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn next_transaction_ticket(&self) -> Ticket {
        self.transaction_tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a newer account refresh has already been applied
    pub(crate) async fn account_ticket_superseded(&self, ticket: Ticket) -> bool {
        ticket <= self.inner.read().await.accounts_applied
    }

    pub(crate) async fn transaction_ticket_superseded(&self, ticket: Ticket) -> bool {
        ticket <= self.inner.read().await.transactions_applied
    }

    /// Replace the account list and re-project every dependent view.
    ///
    /// Returns `false` when a newer refresh has already been applied.
    pub(crate) async fn apply_accounts(&self, ticket: Ticket, accounts: Vec<Account>) -> bool {
        let mut inner = self.inner.write().await;
        if ticket <= inner.accounts_applied {
            return false;
        }

        inner.view.accounts = AccountsView::project(&accounts);
        inner.view.selectors = project_selectors(&accounts);
        inner.accounts = accounts;
        inner.accounts_applied = ticket;
        true
    }

    /// Clear the transaction table to its prompt state
    pub(crate) async fn clear_transactions(&self, ticket: Ticket) -> bool {
        let mut inner = self.inner.write().await;
        if ticket <= inner.transactions_applied {
            return false;
        }

        inner.selected_account = None;
        inner.view.transactions = TransactionsView::Prompt;
        inner.transactions_applied = ticket;
        true
    }

    /// Replace the transaction table for `account_number`.
    ///
    /// Returns `false` when a newer refresh has already been applied.
    pub(crate) async fn apply_transactions(
        &self,
        ticket: Ticket,
        account_number: &str,
        transactions: &[Transaction],
    ) -> bool {
        let mut inner = self.inner.write().await;
        if ticket <= inner.transactions_applied {
            return false;
        }

        inner.selected_account = Some(account_number.to_string());
        inner.view.transactions = TransactionsView::project(transactions);
        inner.transactions_applied = ticket;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account(number: &str) -> Account {
        Account {
            account_number: number.to_string(),
            holder_name: "Alice".to_string(),
            balance: dec!(1),
            id: None,
            phone: None,
            address: None,
            date_of_birth: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_initial_view() {
        let state = AppState::new();
        let view = state.view().await;
        assert_eq!(view.accounts, AccountsView::NotLoaded);
        assert_eq!(view.transactions, TransactionsView::Prompt);
        assert!(view.user_display.is_none());
    }

    #[tokio::test]
    async fn test_stale_ticket_rejected() {
        let state = AppState::new();
        let first = state.next_account_ticket();
        let second = state.next_account_ticket();

        assert!(state.apply_accounts(second, vec![account("NEW")]).await);
        assert!(!state.apply_accounts(first, vec![account("OLD")]).await);

        let accounts = state.accounts().await;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].account_number, "NEW");
    }

    #[tokio::test]
    async fn test_in_order_tickets_both_apply() {
        let state = AppState::new();
        let first = state.next_account_ticket();
        let second = state.next_account_ticket();

        assert!(state.apply_accounts(first, vec![account("A")]).await);
        assert!(state.apply_accounts(second, vec![account("B")]).await);
        assert_eq!(state.accounts().await[0].account_number, "B");
    }

    #[tokio::test]
    async fn test_stale_transaction_tickets_rejected() {
        let state = AppState::new();
        let first = state.next_transaction_ticket();
        let second = state.next_transaction_ticket();
        let third = state.next_transaction_ticket();

        assert!(state.clear_transactions(second).await);
        assert!(state.transaction_ticket_superseded(first).await);
        assert!(!state.apply_transactions(first, "A1", &[]).await);
        assert_eq!(state.view().await.transactions, TransactionsView::Prompt);

        assert!(state.apply_transactions(third, "A2", &[]).await);
        assert!(!state.clear_transactions(second).await);
        assert_eq!(state.selected_account().await.as_deref(), Some("A2"));
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight() {
        let state = AppState::new();
        state
            .set_session(Session {
                id: 1,
                username: "alice".into(),
                email: None,
            })
            .await;
        let ticket = state.next_account_ticket();

        state.reset().await;
        assert!(!state.apply_accounts(ticket, vec![account("A")]).await);
        assert!(state.session().await.is_none());
        assert!(!state.view().await.accounts.is_loaded());
    }

    #[tokio::test]
    async fn test_session_sets_user_display() {
        let state = AppState::new();
        state
            .set_session(Session {
                id: 1,
                username: "alice".into(),
                email: None,
            })
            .await;
        assert_eq!(state.view().await.user_display.as_deref(), Some("alice"));
    }
}
