//! Wire data model
//!
//! Records exchanged with the banking backend. Field names follow the
//! backend's camelCase JSON; unknown fields are ignored.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The authenticated user, as returned by login and kept in the session store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A bank account owned by the session user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: String,
    pub holder_name: String,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// A persisted transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub transaction_date: Option<NaiveDateTime>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub from_account: Option<String>,
    #[serde(default)]
    pub to_account: Option<String>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Transaction type; unknown backend values are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Transfer,
    Other(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Other(s) => s,
        }
    }
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "DEPOSIT" => TransactionType::Deposit,
            "WITHDRAW" => TransactionType::Withdraw,
            "TRANSFER" => TransactionType::Transfer,
            _ => TransactionType::Other(s),
        }
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction status; unknown backend values are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Other(s) => s,
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SUCCESS" => TransactionStatus::Success,
            "FAILED" => TransactionStatus::Failed,
            "PENDING" => TransactionStatus::Pending,
            _ => TransactionStatus::Other(s),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(s: TransactionStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Request DTOs
// ============================================

/// POST /auth/register
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/login
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /accounts/create
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub holder_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_balance: Decimal,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub user_id: i64,
}

/// POST /transactions/{deposit,withdraw,transfer}
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_account_number: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
}

/// Balance payload: a bare number, or the `{accountNumber, balance}` object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum BalancePayload {
    Amount(Decimal),
    #[serde(rename_all = "camelCase")]
    Detailed {
        #[allow(dead_code)]
        account_number: Option<String>,
        balance: Decimal,
    },
}

impl BalancePayload {
    pub(crate) fn amount(self) -> Decimal {
        match self {
            BalancePayload::Amount(d) => d,
            BalancePayload::Detailed { balance, .. } => balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_account_from_backend_json() {
        let account: Account = serde_json::from_value(json!({
            "id": 7,
            "accountNumber": "ACC1001",
            "holderName": "Alice",
            "balance": 100.5,
            "phone": "555-0100",
            "address": "1 Main St",
            "dateOfBirth": "1990-04-01",
            "createdAt": "2024-05-01T10:15:30.123456"
        }))
        .unwrap();

        assert_eq!(account.account_number, "ACC1001");
        assert_eq!(account.balance, dec!(100.5));
        assert_eq!(account.date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 1));
        assert!(account.created_at.is_some());
    }

    #[test]
    fn test_transaction_unknown_type_kept() {
        let tx: Transaction = serde_json::from_value(json!({
            "transactionDate": "2024-05-01T10:15:30",
            "type": "INTEREST",
            "fromAccount": null,
            "toAccount": "ACC1001",
            "amount": 2.25,
            "status": "SUCCESS"
        }))
        .unwrap();

        assert_eq!(tx.kind, TransactionType::Other("INTEREST".into()));
        assert_eq!(tx.status, TransactionStatus::Success);
        assert_eq!(tx.from_account, None);
    }

    #[test]
    fn test_transaction_request_shape() {
        let deposit = TransactionRequest {
            account_number: "ACC1001".into(),
            to_account_number: None,
            amount: dec!(25.50),
            description: "cash".into(),
        };
        let value = serde_json::to_value(&deposit).unwrap();
        assert_eq!(
            value,
            json!({"accountNumber": "ACC1001", "amount": 25.5, "description": "cash"})
        );

        let transfer = TransactionRequest {
            to_account_number: Some("ACC2002".into()),
            ..deposit
        };
        let value = serde_json::to_value(&transfer).unwrap();
        assert_eq!(value["toAccountNumber"], "ACC2002");
    }

    #[test]
    fn test_account_request_shape() {
        let req = AccountRequest {
            holder_name: "Alice".into(),
            initial_balance: dec!(100),
            phone: "555-0100".into(),
            address: "1 Main St".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
            user_id: 3,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["holderName"], "Alice");
        assert_eq!(value["initialBalance"], 100.0);
        assert_eq!(value["dateOfBirth"], "1990-04-01");
        assert_eq!(value["userId"], 3);
    }

    #[test]
    fn test_balance_payload_shapes() {
        let bare: BalancePayload = serde_json::from_value(json!(42.1)).unwrap();
        assert_eq!(bare.amount(), dec!(42.1));

        let detailed: BalancePayload =
            serde_json::from_value(json!({"accountNumber": "ACC1001", "balance": 7})).unwrap();
        assert_eq!(detailed.amount(), dec!(7));
    }

    #[test]
    fn test_session_ignores_extra_fields() {
        let session: Session = serde_json::from_value(json!({
            "id": 3,
            "username": "alice",
            "email": "alice@example.com",
            "createdAt": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(session.id, 3);
        assert_eq!(session.email.as_deref(), Some("alice@example.com"));
    }
}
