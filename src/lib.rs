//! # Bankdash
//!
//! Client for a banking REST backend: login and registration, a dashboard
//! of the user's accounts, and deposit/withdraw/transfer/create-account
//! forms. The "page" is a typed view model, so any front end (terminal,
//! wasm) can render it and every behaviour is testable without a browser.
//!
//! ## Modules
//!
//! - [`api`]: endpoint registry, envelope decoding and the typed [`BankClient`]
//! - [`session`]: durable store for the logged-in user
//! - [`sync`]: account and transaction refresh cycles
//! - [`commands`]: form command dispatcher
//! - [`view`]: dashboard projections (cards, selectors, transaction table)
//! - [`dashboard`]: controller tying the pieces around one [`AppState`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bankdash::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(HttpTransport::new(None)?);
//!     let client = BankClient::new(transport, Endpoints::default());
//!     let sessions = Arc::new(FileSessionStore::new(default_session_path()));
//!     let dashboard = Dashboard::new(client, sessions, Arc::new(ConsoleNotifier));
//!
//!     if dashboard.enter().await? == Route::Login {
//!         println!("Please log in first");
//!         return Ok(());
//!     }
//!
//!     let view = dashboard.state().view().await;
//!     println!("{:?}", view.accounts);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod notify;
pub mod session;
pub mod state;
pub mod sync;
pub mod view;

pub use api::{BankClient, Endpoint, Endpoints, Envelope, HttpTransport, Transport, TransportResponse};

pub use commands::{
    AccountForm, Command, CommandKind, CommandOutcome, CommandPhase, Dialog, Dispatcher, FollowUp,
    MovementForm, Tab, TransferForm,
};

pub use config::{Config, ConfigError, LoggingConfig};

pub use dashboard::{Dashboard, Route};

pub use error::{ClientError, ClientResult, FailureKind};

pub use models::{
    Account, AccountRequest, LoginRequest, RegisterRequest, Session, Transaction,
    TransactionRequest, TransactionStatus, TransactionType,
};

pub use notify::{ConsoleNotifier, Level, Notification, NotificationLog, Notifier};

pub use session::{default_session_path, FileSessionStore, MemorySessionStore, SessionStore};

pub use state::AppState;

pub use sync::{AccountSync, SyncOutcome, TransactionSync};

pub use view::{AccountsView, DashboardView, SelectView, Selector, TransactionRow, TransactionsView};
