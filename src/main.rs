//! Bankdash CLI
//!
//! Command-line front end for the banking dashboard:
//! - Register, log in and out
//! - Show accounts and transactions
//! - Create accounts, deposit, withdraw and transfer

use anyhow::Context;
use bankdash::config::{generate_default_config, Config, LoggingConfig};
use bankdash::commands::SESSION_STORE_FAILED;
use bankdash::view::{
    format_money, AccountsView, DashboardView, TransactionsView, ACCOUNTS_NOT_LOADED_TEXT,
};
use bankdash::*;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bankdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Banking dashboard client")]
#[command(long_about = "Bankdash talks to the banking REST backend.\nLog in once, then manage accounts, deposits, withdrawals and transfers.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a user
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show the account overview
    Dashboard,

    /// Show one account
    Account {
        /// Account number
        number: String,
    },

    /// Show an account's balance
    Balance {
        /// Account number
        number: String,
    },

    /// Open a new account for the logged-in user
    CreateAccount {
        #[arg(long)]
        holder_name: String,
        #[arg(long, default_value = "0")]
        initial_balance: Decimal,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: NaiveDate,
    },

    /// Deposit into an account
    Deposit {
        /// Account number
        account: String,
        amount: Decimal,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Withdraw from an account
    Withdraw {
        /// Account number
        account: String,
        amount: Decimal,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Transfer between accounts
    Transfer {
        /// Source account number
        from: String,
        /// Destination account number
        to: String,
        amount: Decimal,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Show transactions of an account (no account: prompt)
    Transactions {
        /// Account number
        account: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("bankdash={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);
    tracing::debug!(api = %config.api.base_url, "Bankdash v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let json = cli.format == "json";
    let transport = Arc::new(
        HttpTransport::new(config.api.request_timeout()).context("creating HTTP client")?,
    );
    let client = BankClient::new(transport, Endpoints::new(&config.api.base_url));
    let sessions: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session.path));
    let log = Arc::new(NotificationLog::new());
    let notifier: Arc<dyn Notifier> = if json {
        log.clone() as Arc<dyn Notifier>
    } else {
        Arc::new(ConsoleNotifier)
    };

    let dashboard = Dashboard::new(client.clone(), sessions.clone(), notifier)
        .with_create_refresh_delay(config.ui.create_account_refresh_delay());

    let ok = match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let outcome = dashboard
                .dispatch(Command::Register(RegisterRequest {
                    username,
                    email,
                    password,
                }))
                .await;
            report(&outcome, json, &log);
            outcome.is_success()
        }

        Commands::Login { username, password } => {
            let outcome = dashboard
                .dispatch(Command::Login(LoginRequest { username, password }))
                .await;
            report(&outcome, json, &log);
            outcome.is_success()
        }

        Commands::Logout => {
            dashboard.logout().await?;
            if json {
                println!("{}", serde_json::json!({"success": true}));
            } else {
                println!("Logged out");
            }
            true
        }

        Commands::Whoami => match sessions.load_session()? {
            Some(session) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&session)?);
                } else {
                    println!("{} (id {})", session.username, session.id);
                }
                true
            }
            None => {
                eprintln!("Not logged in");
                false
            }
        },

        Commands::Dashboard => {
            if dashboard.enter().await? == Route::Login {
                eprintln!("Not logged in. Run `bankdash login` first.");
                false
            } else {
                let view = dashboard.state().view().await;
                if !view.accounts.is_loaded() {
                    // The sync has already reported the failure
                    if json {
                        print_notifications(&log);
                    }
                    false
                } else {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    } else {
                        print_dashboard(&view);
                    }
                    true
                }
            }
        }

        Commands::Account { number } => match client.account(&number).await {
            Ok(account) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&account)?);
                } else {
                    print_account(&account);
                }
                true
            }
            Err(e) => fail(&e),
        },

        Commands::Balance { number } => match client.balance(&number).await {
            Ok(balance) => {
                if json {
                    println!(
                        "{}",
                        serde_json::json!({"accountNumber": number, "balance": balance})
                    );
                } else {
                    println!("{}: {}", number, format_money(balance));
                }
                true
            }
            Err(e) => fail(&e),
        },

        Commands::CreateAccount {
            holder_name,
            initial_balance,
            phone,
            address,
            date_of_birth,
        } => {
            let command = Command::CreateAccount(AccountForm {
                holder_name,
                initial_balance,
                phone,
                address,
                date_of_birth,
            });
            run_mutation(&dashboard, command, json, &log).await
        }

        Commands::Deposit {
            account,
            amount,
            description,
        } => {
            let command = Command::Deposit(MovementForm {
                account_number: account,
                amount,
                description,
            });
            run_mutation(&dashboard, command, json, &log).await
        }

        Commands::Withdraw {
            account,
            amount,
            description,
        } => {
            let command = Command::Withdraw(MovementForm {
                account_number: account,
                amount,
                description,
            });
            run_mutation(&dashboard, command, json, &log).await
        }

        Commands::Transfer {
            from,
            to,
            amount,
            description,
        } => {
            let command = Command::Transfer(TransferForm {
                from_account: from,
                to_account: to,
                amount,
                description,
            });
            run_mutation(&dashboard, command, json, &log).await
        }

        Commands::Transactions { account } => {
            match dashboard.select_account(account.as_deref()).await {
                Ok(_) => {
                    let view = dashboard.state().view().await;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&view.transactions)?);
                    } else {
                        print_transactions(&view.transactions);
                    }
                    true
                }
                Err(e) => {
                    if json {
                        print_notifications(&log);
                    }
                    tracing::debug!(error = %e, "Transaction load failed");
                    false
                }
            }
        }

        Commands::Config { .. } => unreachable!("handled before connecting"),
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Dispatch an account/transaction mutation and show the refreshed accounts
async fn run_mutation(
    dashboard: &Dashboard,
    command: Command,
    json: bool,
    log: &NotificationLog,
) -> bool {
    let outcome = dashboard.dispatch(command).await;
    report(&outcome, json, log);

    if outcome.is_success() && !json {
        let view = dashboard.state().view().await;
        println!();
        print_accounts(&view.accounts);
    }
    outcome.is_success()
}

fn report(outcome: &CommandOutcome, json: bool, log: &NotificationLog) {
    if !json {
        return;
    }
    let notifications: Vec<_> = log
        .entries()
        .into_iter()
        .map(|n| serde_json::json!({"success": n.is_success(), "message": n.message}))
        .collect();
    println!(
        "{}",
        serde_json::json!({
            "command": outcome.kind().as_str(),
            "success": outcome.is_success(),
            "message": outcome.message(),
            "notifications": notifications,
        })
    );
}

fn print_notifications(log: &NotificationLog) {
    for n in log.entries() {
        println!(
            "{}",
            serde_json::json!({"success": n.is_success(), "message": n.message})
        );
    }
}

fn fail(error: &ClientError) -> bool {
    let message = match (error, error.kind()) {
        (ClientError::Session(_), _) => SESSION_STORE_FAILED.to_string(),
        (_, FailureKind::Application) => error
            .backend_message()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        (_, FailureKind::Transport) => {
            "Error connecting to server. Please make sure the backend is running.".to_string()
        }
    };
    eprintln!("✕ {}", message);
    tracing::debug!(error = %error, "Request failed");
    false
}

fn print_dashboard(view: &DashboardView) {
    if let Some(user) = &view.user_display {
        println!("Welcome, {}", user);
        println!();
    }
    print_accounts(&view.accounts);
}

fn print_accounts(view: &AccountsView) {
    match view {
        AccountsView::NotLoaded => println!("{}", ACCOUNTS_NOT_LOADED_TEXT),
        AccountsView::Placeholder(text) => println!("{}", text),
        AccountsView::Cards(cards) => {
            println!("{:<20} {:<24} {:>16}", "Account", "Holder", "Balance");
            println!("{}", "-".repeat(62));
            for card in cards {
                println!(
                    "{:<20} {:<24} {:>16}",
                    card.account_number, card.holder_name, card.balance
                );
            }
        }
    }
}

fn print_account(account: &Account) {
    println!("Account:  {}", account.account_number);
    println!("Holder:   {}", account.holder_name);
    println!("Balance:  {}", format_money(account.balance));
    if let Some(phone) = &account.phone {
        println!("Phone:    {}", phone);
    }
    if let Some(address) = &account.address {
        println!("Address:  {}", address);
    }
    if let Some(dob) = account.date_of_birth {
        println!("Born:     {}", dob);
    }
}

fn print_transactions(view: &TransactionsView) {
    match view {
        TransactionsView::Rows(rows) => {
            println!(
                "{:<24} {:<10} {:<16} {:<16} {:>12} {:<8}",
                "Date", "Type", "From", "To", "Amount", "Status"
            );
            println!("{}", "-".repeat(91));
            for row in rows {
                println!(
                    "{:<24} {:<10} {:<16} {:<16} {:>12} {:<8}",
                    row.date, row.kind, row.from_account, row.to_account, row.amount, row.status
                );
            }
        }
        other => {
            if let Some(text) = other.placeholder() {
                println!("{}", text);
            }
        }
    }
}
