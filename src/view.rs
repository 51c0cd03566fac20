//! Dashboard view model
//!
//! Plain-data projections of the account list and the selected account's
//! transactions. Every projection is recomputed in full from its source
//! list; nothing is patched incrementally.

use crate::models::{Account, Transaction};
use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NO_ACCOUNTS_TEXT: &str = "No accounts yet. Create your first account!";
pub const ACCOUNTS_NOT_LOADED_TEXT: &str = "Accounts could not be loaded";
pub const CHOOSE_ACCOUNT_TEXT: &str = "Choose account...";
pub const FILTER_PROMPT_TEXT: &str = "Select an account to view transactions";
pub const NO_TRANSACTIONS_TEXT: &str = "No transactions found for this account";
pub const BALANCE_LABEL: &str = "Available Balance";

/// Format an amount as `$x.xx`
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}

/// Format a transaction timestamp the way the dashboard shows it
pub fn format_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One account card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountCard {
    pub account_number: String,
    pub holder_name: String,
    pub balance: String,
    pub balance_label: &'static str,
}

/// The card grid, or the empty-state placeholder.
///
/// `NotLoaded` is the state before any account list has been applied, so a
/// failed first load is never shown as an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum AccountsView {
    NotLoaded,
    Placeholder(&'static str),
    Cards(Vec<AccountCard>),
}

impl AccountsView {
    pub fn project(accounts: &[Account]) -> Self {
        if accounts.is_empty() {
            return AccountsView::Placeholder(NO_ACCOUNTS_TEXT);
        }

        AccountsView::Cards(
            accounts
                .iter()
                .map(|account| AccountCard {
                    account_number: account.account_number.clone(),
                    holder_name: account.holder_name.clone(),
                    balance: format_money(account.balance),
                    balance_label: BALANCE_LABEL,
                })
                .collect(),
        )
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, AccountsView::Placeholder(_))
    }

    /// Whether an account list has been applied at least once
    pub fn is_loaded(&self) -> bool {
        !matches!(self, AccountsView::NotLoaded)
    }
}

/// Account selectors fed from the account list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    DepositAccount,
    WithdrawAccount,
    TransferFromAccount,
    AccountFilter,
}

impl Selector {
    pub const ALL: [Selector; 4] = [
        Selector::DepositAccount,
        Selector::WithdrawAccount,
        Selector::TransferFromAccount,
        Selector::AccountFilter,
    ];

    /// Text of the leading empty-value entry
    pub fn prompt(&self) -> &'static str {
        match self {
            Selector::AccountFilter => FILTER_PROMPT_TEXT,
            _ => CHOOSE_ACCOUNT_TEXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// A dropdown: the empty prompt followed by one option per account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectView {
    pub prompt: &'static str,
    pub options: Vec<SelectOption>,
}

impl SelectView {
    pub fn project(selector: Selector, accounts: &[Account]) -> Self {
        Self {
            prompt: selector.prompt(),
            options: accounts
                .iter()
                .map(|account| SelectOption {
                    value: account.account_number.clone(),
                    label: format!("{} - {}", account.account_number, account.holder_name),
                })
                .collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Project all four selectors
pub fn project_selectors(accounts: &[Account]) -> BTreeMap<Selector, SelectView> {
    Selector::ALL
        .iter()
        .map(|&selector| (selector, SelectView::project(selector, accounts)))
        .collect()
}

/// One rendered transaction row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub kind: String,
    pub kind_badge: String,
    pub from_account: String,
    pub to_account: String,
    pub amount: String,
    pub status: String,
    pub status_badge: String,
}

impl TransactionRow {
    pub fn project(tx: &Transaction) -> Self {
        let kind = tx.kind.as_str().to_string();
        let status = tx.status.as_str().to_string();

        Self {
            date: format_timestamp(tx.transaction_date),
            kind_badge: format!("type-{}", kind.to_lowercase()),
            kind,
            from_account: tx.from_account.clone().unwrap_or_else(|| "-".to_string()),
            to_account: tx.to_account.clone().unwrap_or_else(|| "-".to_string()),
            amount: format_money(tx.amount),
            status_badge: format!("status-{}", status.to_lowercase()),
            status,
        }
    }
}

/// The transaction table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "rows", rename_all = "snake_case")]
pub enum TransactionsView {
    /// No account selected
    Prompt,
    /// Account selected, backend returned nothing
    Empty,
    Rows(Vec<TransactionRow>),
}

impl TransactionsView {
    pub fn project(transactions: &[Transaction]) -> Self {
        if transactions.is_empty() {
            return TransactionsView::Empty;
        }
        TransactionsView::Rows(transactions.iter().map(TransactionRow::project).collect())
    }

    /// Text of the single placeholder row, if the table shows one
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            TransactionsView::Prompt => Some(FILTER_PROMPT_TEXT),
            TransactionsView::Empty => Some(NO_TRANSACTIONS_TEXT),
            TransactionsView::Rows(_) => None,
        }
    }
}

/// Everything the dashboard displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub user_display: Option<String>,
    pub accounts: AccountsView,
    pub selectors: BTreeMap<Selector, SelectView>,
    pub transactions: TransactionsView,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            user_display: None,
            accounts: AccountsView::NotLoaded,
            selectors: project_selectors(&[]),
            transactions: TransactionsView::Prompt,
        }
    }
}

impl DashboardView {
    pub fn selector(&self, selector: Selector) -> &SelectView {
        // Always populated by `project_selectors`
        &self.selectors[&selector]
    }
}
