//! Dashboard controller
//!
//! Wires the session store, the two syncs and the command dispatcher
//! around one [`AppState`].

use crate::api::BankClient;
use crate::commands::{Command, CommandOutcome, Dispatcher};
use crate::error::ClientResult;
use crate::notify::Notifier;
use crate::session::SessionStore;
use crate::state::AppState;
use crate::sync::{AccountSync, SyncOutcome, TransactionSync};
use std::sync::Arc;
use std::time::Duration;

/// Where the user ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

/// The authenticated dashboard
#[derive(Clone)]
pub struct Dashboard {
    sessions: Arc<dyn SessionStore>,
    state: AppState,
    accounts: AccountSync,
    transactions: TransactionSync,
    dispatcher: Dispatcher,
}

impl Dashboard {
    pub fn new(
        client: BankClient,
        sessions: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let state = AppState::new();
        let accounts = AccountSync::new(client.clone(), state.clone(), notifier.clone());
        let transactions = TransactionSync::new(client.clone(), state.clone(), notifier.clone());
        let dispatcher = Dispatcher::new(client, sessions.clone(), state.clone(), notifier);

        Self {
            sessions,
            state,
            accounts,
            transactions,
            dispatcher,
        }
    }

    pub fn with_create_refresh_delay(mut self, delay: Duration) -> Self {
        self.dispatcher = self.dispatcher.with_create_refresh_delay(delay);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Open the dashboard.
    ///
    /// Without a stored session this routes to login and touches nothing
    /// else. With one, the session is installed and accounts are loaded; a
    /// failed load is notified but still lands on the dashboard, with the
    /// account view left as [`AccountsView::NotLoaded`](crate::view::AccountsView::NotLoaded).
    pub async fn enter(&self) -> ClientResult<Route> {
        let Some(session) = self.sessions.load_session()? else {
            tracing::info!("No session, redirecting to login");
            return Ok(Route::Login);
        };

        tracing::info!(user = %session.username, "Entering dashboard");
        let user_id = session.id;
        self.state.set_session(session).await;

        if let Err(e) = self.accounts.refresh_accounts(user_id).await {
            tracing::debug!(error = %e, "Initial account load failed");
        }
        Ok(Route::Dashboard)
    }

    /// Forget the session and go back to login
    pub async fn logout(&self) -> ClientResult<Route> {
        self.sessions.clear_session()?;
        self.state.reset().await;
        tracing::info!("Logged out");
        Ok(Route::Login)
    }

    /// Reload the session user's accounts
    pub async fn refresh(&self) -> ClientResult<SyncOutcome> {
        let session = match self.state.session().await {
            Some(session) => session,
            None => self
                .sessions
                .load_session()?
                .ok_or(crate::error::ClientError::NoSession)?,
        };
        self.accounts.refresh_accounts(session.id).await
    }

    /// Account filter changed; `None`/empty clears the table
    pub async fn select_account(&self, account_number: Option<&str>) -> ClientResult<SyncOutcome> {
        self.transactions.refresh_transactions(account_number).await
    }

    /// Submit a form
    pub async fn dispatch(&self, command: Command) -> CommandOutcome {
        self.dispatcher.dispatch(command).await
    }
}
