//! Account Sync

use super::SyncOutcome;
use crate::api::BankClient;
use crate::error::ClientResult;
use crate::notify::{Notification, Notifier};
use crate::state::AppState;
use std::sync::Arc;

pub const LOAD_ACCOUNTS_FAILED: &str = "Error loading accounts";

/// Reloads the session user's accounts into [`AppState`]
#[derive(Clone)]
pub struct AccountSync {
    client: BankClient,
    state: AppState,
    notifier: Arc<dyn Notifier>,
}

impl AccountSync {
    pub fn new(client: BankClient, state: AppState, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            state,
            notifier,
        }
    }

    /// Fetch all accounts of `user_id` and re-project every dependent view.
    ///
    /// On failure the previous list stays in place and a notification is shown,
    /// unless a newer refresh has already been applied.
    pub async fn refresh_accounts(&self, user_id: i64) -> ClientResult<SyncOutcome> {
        let ticket = self.state.next_account_ticket();
        tracing::debug!(user_id, ticket, "Refreshing accounts");

        let accounts = match self.client.user_accounts(user_id).await {
            Ok(accounts) => accounts,
            Err(e) => {
                if self.state.account_ticket_superseded(ticket).await {
                    tracing::debug!(user_id, ticket, error = %e, "Dropping superseded account failure");
                    return Ok(SyncOutcome::Superseded);
                }
                tracing::debug!(user_id, error = %e, "Error loading accounts");
                let message = e.backend_message().unwrap_or(LOAD_ACCOUNTS_FAILED).to_string();
                self.notifier.notify(Notification::danger(message));
                return Err(e);
            }
        };

        let count = accounts.len();
        if self.state.apply_accounts(ticket, accounts).await {
            tracing::info!(user_id, accounts = count, "Accounts refreshed");
            Ok(SyncOutcome::Applied(count))
        } else {
            tracing::debug!(user_id, ticket, "Dropping superseded account refresh");
            Ok(SyncOutcome::Superseded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeTransport;
    use crate::api::{Endpoints, Method};
    use crate::notify::{Level, NotificationLog};
    use crate::view::{AccountsView, Selector, NO_ACCOUNTS_TEXT};
    use serde_json::json;

    const BASE: &str = "http://bank.test/api";
    const ACCOUNTS_URL: &str = "http://bank.test/api/accounts/user/3";

    fn setup() -> (Arc<FakeTransport>, AppState, Arc<NotificationLog>, AccountSync) {
        let fake = FakeTransport::new();
        let client = BankClient::new(fake.clone(), Endpoints::new(BASE));
        let state = AppState::new();
        let log = Arc::new(NotificationLog::new());
        let sync = AccountSync::new(client, state.clone(), log.clone());
        (fake, state, log, sync)
    }

    fn alice_accounts() -> serde_json::Value {
        json!({"success": true, "data": [{"accountNumber": "A1", "holderName": "Alice", "balance": 100.5}]})
    }

    #[tokio::test]
    async fn test_empty_list_renders_placeholder() {
        let (fake, state, _log, sync) = setup();
        fake.reply(Method::Get, ACCOUNTS_URL, json!({"success": true, "data": []}));

        let outcome = sync.refresh_accounts(3).await.unwrap();
        assert_eq!(outcome, SyncOutcome::Applied(0));

        let view = state.view().await;
        assert_eq!(view.accounts, AccountsView::Placeholder(NO_ACCOUNTS_TEXT));
        let options: usize = view.selectors.values().map(|s| s.options.len()).sum();
        assert_eq!(options, 0);
    }

    #[tokio::test]
    async fn test_single_account_feeds_all_selectors() {
        let (fake, state, _log, sync) = setup();
        fake.reply(Method::Get, ACCOUNTS_URL, alice_accounts());

        sync.refresh_accounts(3).await.unwrap();

        let view = state.view().await;
        for selector in Selector::ALL {
            let select = view.selector(selector);
            assert_eq!(select.options.len(), 1);
            assert_eq!(select.options[0].value, "A1");
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_list() {
        let (fake, state, log, sync) = setup();
        fake.reply(Method::Get, ACCOUNTS_URL, alice_accounts());
        fake.fail(Method::Get, ACCOUNTS_URL, "connection reset");

        sync.refresh_accounts(3).await.unwrap();
        assert!(sync.refresh_accounts(3).await.is_err());

        assert_eq!(state.accounts().await.len(), 1);
        assert_eq!(log.entries().len(), 1);
        let note = log.last().unwrap();
        assert_eq!(note.level, Level::Danger);
        assert_eq!(note.message, LOAD_ACCOUNTS_FAILED);
    }

    #[tokio::test]
    async fn test_application_failure_shows_backend_message() {
        let (fake, state, log, sync) = setup();
        fake.reply(
            Method::Get,
            ACCOUNTS_URL,
            json!({"success": false, "message": "User not found"}),
        );

        assert!(sync.refresh_accounts(3).await.is_err());
        assert_eq!(state.view().await.accounts, AccountsView::NotLoaded);
        assert_eq!(log.last().unwrap().message, "User not found");
    }

    #[tokio::test]
    async fn test_late_response_is_superseded() {
        let (fake, state, _log, sync) = setup();
        let gate = fake.reply_gated(
            Method::Get,
            ACCOUNTS_URL,
            json!({"success": true, "data": [{"accountNumber": "OLD", "holderName": "Alice", "balance": 1}]}),
        );
        fake.reply(
            Method::Get,
            ACCOUNTS_URL,
            json!({"success": true, "data": [{"accountNumber": "NEW", "holderName": "Alice", "balance": 2}]}),
        );

        let slow = {
            let sync = sync.clone();
            tokio::spawn(async move { sync.refresh_accounts(3).await })
        };
        while fake.count(Method::Get, ACCOUNTS_URL) < 1 {
            tokio::task::yield_now().await;
        }

        let fast = sync.refresh_accounts(3).await.unwrap();
        assert_eq!(fast, SyncOutcome::Applied(1));

        gate.notify_one();
        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow, SyncOutcome::Superseded);

        assert_eq!(state.accounts().await[0].account_number, "NEW");
    }

    #[tokio::test]
    async fn test_late_failure_after_newer_success_is_silent() {
        let (fake, state, log, sync) = setup();
        let gate = fake.reply_gated(
            Method::Get,
            ACCOUNTS_URL,
            json!({"success": false, "message": "Temporarily unavailable"}),
        );
        fake.reply(Method::Get, ACCOUNTS_URL, alice_accounts());

        let slow = {
            let sync = sync.clone();
            tokio::spawn(async move { sync.refresh_accounts(3).await })
        };
        while fake.count(Method::Get, ACCOUNTS_URL) < 1 {
            tokio::task::yield_now().await;
        }

        assert_eq!(sync.refresh_accounts(3).await.unwrap(), SyncOutcome::Applied(1));

        gate.notify_one();
        assert_eq!(slow.await.unwrap().unwrap(), SyncOutcome::Superseded);

        assert!(log.entries().is_empty());
        assert_eq!(state.accounts().await[0].account_number, "A1");
    }
}
