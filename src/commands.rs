//! Form Command Dispatcher
//!
//! Each user form maps to exactly one backend request. The static
//! [`DISPATCH_TABLE`] holds the per-command texts and follow-ups; the
//! [`Dispatcher`] runs one command through `idle → submitting → settled`,
//! shows the notification and performs the follow-ups.

use crate::api::BankClient;
use crate::dashboard::Route;
use crate::error::{ClientError, ClientResult, FailureKind};
use crate::models::{AccountRequest, LoginRequest, RegisterRequest, TransactionRequest};
use crate::notify::{Notification, Notifier, ALERT_TTL, TOAST_TTL};
use crate::session::SessionStore;
use crate::state::AppState;
use crate::sync::AccountSync;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Instrument;

/// Message shown when a create-account is attempted without a session
pub const SESSION_REQUIRED: &str = "Your session has ended. Please log in again.";

/// Message shown when the local session file cannot be read or written
pub const SESSION_STORE_FAILED: &str = "Session storage is unavailable on this device.";

/// Create-account form fields; `userId` comes from the session
#[derive(Debug, Clone)]
pub struct AccountForm {
    pub holder_name: String,
    pub initial_balance: Decimal,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
}

/// Deposit and withdraw form fields
#[derive(Debug, Clone)]
pub struct MovementForm {
    pub account_number: String,
    pub amount: Decimal,
    pub description: String,
}

/// Transfer form fields
#[derive(Debug, Clone)]
pub struct TransferForm {
    pub from_account: String,
    pub to_account: String,
    pub amount: Decimal,
    pub description: String,
}

/// One form submission
#[derive(Debug, Clone)]
pub enum Command {
    Register(RegisterRequest),
    Login(LoginRequest),
    CreateAccount(AccountForm),
    Deposit(MovementForm),
    Withdraw(MovementForm),
    Transfer(TransferForm),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Register(_) => CommandKind::Register,
            Command::Login(_) => CommandKind::Login,
            Command::CreateAccount(_) => CommandKind::CreateAccount,
            Command::Deposit(_) => CommandKind::Deposit,
            Command::Withdraw(_) => CommandKind::Withdraw,
            Command::Transfer(_) => CommandKind::Transfer,
        }
    }
}

/// Command names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Register,
    Login,
    CreateAccount,
    Deposit,
    Withdraw,
    Transfer,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Register => "register",
            CommandKind::Login => "login",
            CommandKind::CreateAccount => "create-account",
            CommandKind::Deposit => "deposit",
            CommandKind::Withdraw => "withdraw",
            CommandKind::Transfer => "transfer",
        }
    }

    /// Dispatch table entry for this command
    pub fn entry(&self) -> &'static CommandEntry {
        DISPATCH_TABLE
            .iter()
            .find(|entry| entry.kind == *self)
            .unwrap_or_else(|| unreachable!("every command kind has a table entry"))
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auth page tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Login,
    Register,
}

/// Dashboard modal dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    CreateAccount,
    Deposit,
    Withdraw,
    Transfer,
}

/// UI effect performed after a successful command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Redirect(Route),
    SwitchTab(Tab),
    CloseDialog(Dialog),
    ResetForm,
    RefreshAccounts,
}

/// Static per-command behaviour
#[derive(Debug)]
pub struct CommandEntry {
    pub kind: CommandKind,
    /// Shown on `success: true`
    pub success: &'static str,
    /// Shown on `success: false` when the backend gave no message
    pub failure: &'static str,
    /// Shown when the backend could not be reached
    pub transport_failure: &'static str,
    pub follow_ups: &'static [FollowUp],
    pub ttl: Duration,
}

const CONNECT_FAILED: &str = "Error connecting to server. Please make sure the backend is running.";

/// Command name → texts and follow-ups
pub const DISPATCH_TABLE: &[CommandEntry] = &[
    CommandEntry {
        kind: CommandKind::Register,
        success: "Registration successful! Please login.",
        failure: "Registration failed",
        transport_failure: CONNECT_FAILED,
        follow_ups: &[FollowUp::ResetForm, FollowUp::SwitchTab(Tab::Login)],
        ttl: ALERT_TTL,
    },
    CommandEntry {
        kind: CommandKind::Login,
        success: "Login successful! Redirecting...",
        failure: "Login failed",
        transport_failure: CONNECT_FAILED,
        follow_ups: &[FollowUp::Redirect(Route::Dashboard)],
        ttl: ALERT_TTL,
    },
    CommandEntry {
        kind: CommandKind::CreateAccount,
        success: "Account created successfully!",
        failure: "Failed to create account",
        transport_failure: "Error creating account",
        follow_ups: &[
            FollowUp::CloseDialog(Dialog::CreateAccount),
            FollowUp::ResetForm,
            FollowUp::RefreshAccounts,
        ],
        ttl: TOAST_TTL,
    },
    CommandEntry {
        kind: CommandKind::Deposit,
        success: "Deposit successful!",
        failure: "Deposit failed",
        transport_failure: "Error making deposit",
        follow_ups: &[
            FollowUp::CloseDialog(Dialog::Deposit),
            FollowUp::ResetForm,
            FollowUp::RefreshAccounts,
        ],
        ttl: TOAST_TTL,
    },
    CommandEntry {
        kind: CommandKind::Withdraw,
        success: "Withdrawal successful!",
        failure: "Withdrawal failed",
        transport_failure: "Error making withdrawal",
        follow_ups: &[
            FollowUp::CloseDialog(Dialog::Withdraw),
            FollowUp::ResetForm,
            FollowUp::RefreshAccounts,
        ],
        ttl: TOAST_TTL,
    },
    CommandEntry {
        kind: CommandKind::Transfer,
        success: "Transfer successful!",
        failure: "Transfer failed",
        transport_failure: "Error making transfer",
        follow_ups: &[
            FollowUp::CloseDialog(Dialog::Transfer),
            FollowUp::ResetForm,
            FollowUp::RefreshAccounts,
        ],
        ttl: TOAST_TTL,
    },
];

/// Lifecycle of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Settled result of a dispatch
#[derive(Debug)]
pub enum CommandOutcome {
    Succeeded {
        kind: CommandKind,
        message: String,
        follow_ups: Vec<FollowUp>,
    },
    Failed {
        kind: CommandKind,
        message: String,
        error: ClientError,
    },
}

impl CommandOutcome {
    pub fn kind(&self) -> CommandKind {
        match self {
            CommandOutcome::Succeeded { kind, .. } | CommandOutcome::Failed { kind, .. } => *kind,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CommandOutcome::Succeeded { message, .. } | CommandOutcome::Failed { message, .. } => {
                message
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded { .. })
    }

    pub fn phase(&self) -> CommandPhase {
        if self.is_success() {
            CommandPhase::Succeeded
        } else {
            CommandPhase::Failed
        }
    }
}

/// Runs form commands against the backend
#[derive(Clone)]
pub struct Dispatcher {
    client: BankClient,
    sessions: Arc<dyn SessionStore>,
    state: AppState,
    accounts: AccountSync,
    notifier: Arc<dyn Notifier>,
    create_refresh_delay: Duration,
    phases: Arc<Mutex<HashMap<CommandKind, CommandPhase>>>,
}

impl Dispatcher {
    pub fn new(
        client: BankClient,
        sessions: Arc<dyn SessionStore>,
        state: AppState,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let accounts = AccountSync::new(client.clone(), state.clone(), notifier.clone());
        Self {
            client,
            sessions,
            state,
            accounts,
            notifier,
            create_refresh_delay: Duration::from_millis(500),
            phases: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Delay between a created account and the follow-up refresh
    pub fn with_create_refresh_delay(mut self, delay: Duration) -> Self {
        self.create_refresh_delay = delay;
        self
    }

    /// Phase of the most recent submission of `kind`
    pub fn phase(&self, kind: CommandKind) -> CommandPhase {
        self.phases
            .lock()
            .ok()
            .and_then(|phases| phases.get(&kind).copied())
            .unwrap_or_default()
    }

    fn set_phase(&self, kind: CommandKind, phase: CommandPhase) {
        if let Ok(mut phases) = self.phases.lock() {
            phases.insert(kind, phase);
        }
    }

    /// Submit one command and settle it
    pub async fn dispatch(&self, command: Command) -> CommandOutcome {
        let kind = command.kind();
        let span = tracing::info_span!(
            "command",
            kind = %kind,
            request_id = %uuid::Uuid::new_v4()
        );
        self.run(command).instrument(span).await
    }

    async fn run(&self, command: Command) -> CommandOutcome {
        let kind = command.kind();
        let entry = kind.entry();

        self.set_phase(kind, CommandPhase::Submitting);
        tracing::debug!("Submitting command");

        let outcome = match self.submit(command).await {
            Ok(()) => {
                self.notifier
                    .notify(Notification::success(entry.success).with_ttl(entry.ttl));
                tracing::info!("Command succeeded");

                self.perform_follow_ups(kind, entry.follow_ups).await;

                CommandOutcome::Succeeded {
                    kind,
                    message: entry.success.to_string(),
                    follow_ups: entry.follow_ups.to_vec(),
                }
            }
            Err(error) => {
                let message = failure_message(entry, &error);
                tracing::debug!(error = %error, "Command failed");
                self.notifier
                    .notify(Notification::danger(message.clone()).with_ttl(entry.ttl));

                CommandOutcome::Failed {
                    kind,
                    message,
                    error,
                }
            }
        };

        self.set_phase(kind, outcome.phase());
        outcome
    }

    /// Issue the single network request for `command`
    async fn submit(&self, command: Command) -> ClientResult<()> {
        match command {
            Command::Register(form) => {
                self.client.register(&form).await?;
            }
            Command::Login(form) => {
                let session = self.client.login(&form).await?;
                self.sessions.save_session(&session)?;
                self.state.set_session(session).await;
            }
            Command::CreateAccount(form) => {
                let user_id = self.session_user_id().await?.ok_or(ClientError::NoSession)?;
                let request = AccountRequest {
                    holder_name: form.holder_name,
                    initial_balance: form.initial_balance,
                    phone: form.phone,
                    address: form.address,
                    date_of_birth: form.date_of_birth,
                    user_id,
                };
                self.client.create_account(&request).await?;
            }
            Command::Deposit(form) => {
                self.client.deposit(&movement_request(form)).await?;
            }
            Command::Withdraw(form) => {
                self.client.withdraw(&movement_request(form)).await?;
            }
            Command::Transfer(form) => {
                let request = TransactionRequest {
                    account_number: form.from_account,
                    to_account_number: Some(form.to_account),
                    amount: form.amount,
                    description: form.description,
                };
                self.client.transfer(&request).await?;
            }
        }
        Ok(())
    }

    async fn perform_follow_ups(&self, kind: CommandKind, follow_ups: &[FollowUp]) {
        for follow_up in follow_ups {
            if *follow_up != FollowUp::RefreshAccounts {
                tracing::debug!(?follow_up, "Follow-up");
                continue;
            }

            let user_id = match self.session_user_id().await {
                Ok(Some(id)) => id,
                Ok(None) | Err(_) => {
                    tracing::warn!("No session, skipping account refresh");
                    continue;
                }
            };

            if kind == CommandKind::CreateAccount && !self.create_refresh_delay.is_zero() {
                tokio::time::sleep(self.create_refresh_delay).await;
            }

            // Failures are already notified by the sync
            let _ = self.accounts.refresh_accounts(user_id).await;
        }
    }

    async fn session_user_id(&self) -> ClientResult<Option<i64>> {
        if let Some(session) = self.state.session().await {
            return Ok(Some(session.id));
        }
        Ok(self.sessions.load_session()?.map(|s| s.id))
    }
}

fn movement_request(form: MovementForm) -> TransactionRequest {
    TransactionRequest {
        account_number: form.account_number,
        to_account_number: None,
        amount: form.amount,
        description: form.description,
    }
}

fn failure_message(entry: &CommandEntry, error: &ClientError) -> String {
    match error {
        ClientError::NoSession => return SESSION_REQUIRED.to_string(),
        ClientError::Session(_) => return SESSION_STORE_FAILED.to_string(),
        _ => {}
    }
    match error.kind() {
        FailureKind::Application => error.backend_message().unwrap_or(entry.failure).to_string(),
        FailureKind::Transport => entry.transport_failure.to_string(),
    }
}
