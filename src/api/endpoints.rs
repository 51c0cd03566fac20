//! Endpoint registry
//!
//! Maps every logical backend operation to its HTTP method and
//! fully-qualified URL.

use std::fmt;

/// Default backend base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// HTTP method used by an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Logical backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Login,
    CreateAccount,
    UserAccounts(i64),
    Account(String),
    Balance(String),
    Deposit,
    Withdraw,
    Transfer,
    AccountTransactions(String),
}

impl Endpoint {
    /// HTTP method for this operation
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Register
            | Endpoint::Login
            | Endpoint::CreateAccount
            | Endpoint::Deposit
            | Endpoint::Withdraw
            | Endpoint::Transfer => Method::Post,
            Endpoint::UserAccounts(_)
            | Endpoint::Account(_)
            | Endpoint::Balance(_)
            | Endpoint::AccountTransactions(_) => Method::Get,
        }
    }

    /// Path relative to the API base
    pub fn path(&self) -> String {
        match self {
            Endpoint::Register => "/auth/register".to_string(),
            Endpoint::Login => "/auth/login".to_string(),
            Endpoint::CreateAccount => "/accounts/create".to_string(),
            Endpoint::UserAccounts(user_id) => format!("/accounts/user/{}", user_id),
            Endpoint::Account(number) => format!("/accounts/{}", urlencoding::encode(number)),
            Endpoint::Balance(number) => {
                format!("/accounts/{}/balance", urlencoding::encode(number))
            }
            Endpoint::Deposit => "/transactions/deposit".to_string(),
            Endpoint::Withdraw => "/transactions/withdraw".to_string(),
            Endpoint::Transfer => "/transactions/transfer".to_string(),
            Endpoint::AccountTransactions(number) => {
                format!("/transactions/account/{}", urlencoding::encode(number))
            }
        }
    }
}

/// Resolves endpoints against a base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        // Normalize: remove trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fully-qualified URL for an endpoint
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}
