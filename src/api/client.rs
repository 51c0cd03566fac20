//! Banking REST API client
//!
//! One typed method per backend operation. Every response is decoded
//! through the envelope, so a `success: false` answer comes back as
//! [`ClientError::Application`] regardless of the HTTP status.

use crate::api::endpoints::{Endpoint, Endpoints, Method};
use crate::api::envelope::Envelope;
use crate::api::transport::Transport;
use crate::error::ClientResult;
use crate::models::{
    Account, AccountRequest, BalancePayload, LoginRequest, RegisterRequest, Session, Transaction,
    TransactionRequest,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Typed client for the banking backend
#[derive(Clone)]
pub struct BankClient {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
}

impl BankClient {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// POST /auth/register
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Option<String>> {
        let envelope = self.post(&Endpoint::Register, request).await?;
        Ok(envelope.message)
    }

    /// POST /auth/login
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<Session> {
        self.post(&Endpoint::Login, request).await?.into_data()
    }

    /// POST /accounts/create
    pub async fn create_account(&self, request: &AccountRequest) -> ClientResult<Option<String>> {
        let envelope = self.post(&Endpoint::CreateAccount, request).await?;
        Ok(envelope.message)
    }

    /// GET /accounts/user/{userId}
    pub async fn user_accounts(&self, user_id: i64) -> ClientResult<Vec<Account>> {
        self.get(&Endpoint::UserAccounts(user_id)).await?.into_data()
    }

    /// GET /accounts/{accountNumber}
    pub async fn account(&self, account_number: &str) -> ClientResult<Account> {
        self.get(&Endpoint::Account(account_number.to_string()))
            .await?
            .into_data()
    }

    /// GET /accounts/{accountNumber}/balance
    pub async fn balance(&self, account_number: &str) -> ClientResult<Decimal> {
        let payload: BalancePayload = self
            .get(&Endpoint::Balance(account_number.to_string()))
            .await?
            .into_data()?;
        Ok(payload.amount())
    }

    /// POST /transactions/deposit
    pub async fn deposit(&self, request: &TransactionRequest) -> ClientResult<Option<String>> {
        let envelope = self.post(&Endpoint::Deposit, request).await?;
        Ok(envelope.message)
    }

    /// POST /transactions/withdraw
    pub async fn withdraw(&self, request: &TransactionRequest) -> ClientResult<Option<String>> {
        let envelope = self.post(&Endpoint::Withdraw, request).await?;
        Ok(envelope.message)
    }

    /// POST /transactions/transfer
    pub async fn transfer(&self, request: &TransactionRequest) -> ClientResult<Option<String>> {
        let envelope = self.post(&Endpoint::Transfer, request).await?;
        Ok(envelope.message)
    }

    /// GET /transactions/account/{accountNumber}
    pub async fn account_transactions(&self, account_number: &str) -> ClientResult<Vec<Transaction>> {
        self.get(&Endpoint::AccountTransactions(account_number.to_string()))
            .await?
            .into_data()
    }

    async fn get(&self, endpoint: &Endpoint) -> ClientResult<Envelope<Value>> {
        debug_assert_eq!(endpoint.method(), Method::Get);
        let url = self.endpoints.url(endpoint);
        tracing::debug!(method = "GET", url = %url, "Sending request");

        let response = self.transport.get(&url).await?;
        tracing::debug!(url = %url, status = response.status, "Received response");

        Envelope::parse(&response.body)?.into_success()
    }

    async fn post<B: Serialize>(&self, endpoint: &Endpoint, body: &B) -> ClientResult<Envelope<Value>> {
        debug_assert_eq!(endpoint.method(), Method::Post);
        let url = self.endpoints.url(endpoint);
        tracing::debug!(method = "POST", url = %url, "Sending request");

        let body = serde_json::to_value(body)?;
        let response = self.transport.post_json(&url, body).await?;
        tracing::debug!(url = %url, status = response.status, "Received response");

        Envelope::parse(&response.body)?.into_success()
    }
}
