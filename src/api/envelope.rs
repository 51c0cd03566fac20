//! Response envelope
//!
//! Every backend response is wrapped as `{success, message, data}`.

use crate::error::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{success, message, data}` wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl Envelope<Value> {
    /// Parse a raw response body
    pub fn parse(body: &str) -> ClientResult<Self> {
        serde_json::from_str(body)
            .map_err(|e| ClientError::Decode(format!("response is not an envelope: {}", e)))
    }

    /// Turn a failure envelope into an error, keep a success envelope as is
    pub fn into_success(self) -> ClientResult<Self> {
        if self.success {
            return Ok(self);
        }

        let mut message = self.message;

        // Validation failures carry {field: reason} in data
        if let (Some(msg), Some(Value::Object(fields))) = (message.as_mut(), self.data.as_ref()) {
            let mut details: Vec<String> = fields
                .iter()
                .filter_map(|(field, reason)| reason.as_str().map(|r| format!("{}: {}", field, r)))
                .collect();
            if !details.is_empty() {
                details.sort();
                msg.push_str(" (");
                msg.push_str(&details.join(", "));
                msg.push(')');
            }
        }

        Err(ClientError::Application { message })
    }

    /// Decode the payload of a successful envelope
    pub fn into_data<T: DeserializeOwned>(self) -> ClientResult<T> {
        let envelope = self.into_success()?;
        let data = envelope.data.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(ClientError::from)
    }
}
