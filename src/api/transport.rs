//! HTTP transport
//!
//! The seam between the typed client and the network. The backend answers
//! errors with an envelope body too, so the transport hands back the body
//! whatever the status code.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Raw response from the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Issues requests against the backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a URL
    async fn get(&self, url: &str) -> ClientResult<TransportResponse>;

    /// POST a JSON body to a URL
    async fn post_json(&self, url: &str, body: serde_json::Value) -> ClientResult<TransportResponse>;
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport; `None` leaves the timeout at the transport default
    pub fn new(request_timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = Client::builder().user_agent(concat!("bankdash/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn read(response: reqwest::Response) -> ClientResult<TransportResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> ClientResult<TransportResponse> {
        let response = self.client.get(url).send().await?;
        Self::read(response).await
    }

    async fn post_json(&self, url: &str, body: serde_json::Value) -> ClientResult<TransportResponse> {
        let response = self.client.post(url).json(&body).send().await?;
        Self::read(response).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory transport

    use super::*;
    use crate::api::endpoints::Method;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// One scripted reply
    #[derive(Clone)]
    pub struct Scripted {
        pub result: Result<TransportResponse, String>,
        pub gate: Option<Arc<Notify>>,
    }

    /// A request seen by the fake
    #[derive(Debug, Clone, PartialEq)]
    pub struct Recorded {
        pub method: Method,
        pub url: String,
        pub body: Option<serde_json::Value>,
    }

    /// Replies from per-URL queues; the last reply of a queue is sticky
    #[derive(Default)]
    pub struct FakeTransport {
        replies: Mutex<HashMap<(String, String), VecDeque<Scripted>>>,
        requests: Mutex<Vec<Recorded>>,
    }

    fn key(method: Method, url: &str) -> (String, String) {
        (method.to_string(), url.to_string())
    }

    impl FakeTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Queue a JSON reply
        pub fn reply(&self, method: Method, url: &str, body: serde_json::Value) {
            self.push(
                method,
                url,
                Scripted {
                    result: Ok(TransportResponse {
                        status: 200,
                        body: body.to_string(),
                    }),
                    gate: None,
                },
            );
        }

        /// Queue a raw reply with a status code
        pub fn reply_raw(&self, method: Method, url: &str, status: u16, body: &str) {
            self.push(
                method,
                url,
                Scripted {
                    result: Ok(TransportResponse {
                        status,
                        body: body.to_string(),
                    }),
                    gate: None,
                },
            );
        }

        /// Queue a JSON reply that is held until the returned gate is notified
        pub fn reply_gated(&self, method: Method, url: &str, body: serde_json::Value) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.push(
                method,
                url,
                Scripted {
                    result: Ok(TransportResponse {
                        status: 200,
                        body: body.to_string(),
                    }),
                    gate: Some(gate.clone()),
                },
            );
            gate
        }

        /// Queue a network failure
        pub fn fail(&self, method: Method, url: &str, reason: &str) {
            self.push(
                method,
                url,
                Scripted {
                    result: Err(reason.to_string()),
                    gate: None,
                },
            );
        }

        fn push(&self, method: Method, url: &str, scripted: Scripted) {
            self.replies
                .lock()
                .unwrap()
                .entry(key(method, url))
                .or_default()
                .push_back(scripted);
        }

        pub fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }

        /// Number of requests sent to a URL
        pub fn count(&self, method: Method, url: &str) -> usize {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.method == method && r.url == url)
                .count()
        }

        async fn answer(
            &self,
            method: Method,
            url: &str,
            body: Option<serde_json::Value>,
        ) -> ClientResult<TransportResponse> {
            self.requests.lock().unwrap().push(Recorded {
                method,
                url: url.to_string(),
                body,
            });

            let scripted = {
                let mut replies = self.replies.lock().unwrap();
                let queue = replies.get_mut(&key(method, url));
                match queue {
                    Some(q) if q.len() > 1 => q.pop_front(),
                    Some(q) => q.front().cloned(),
                    None => None,
                }
            };

            let scripted = scripted
                .ok_or_else(|| ClientError::Transport(format!("no route for {} {}", method, url)))?;

            if let Some(gate) = scripted.gate {
                gate.notified().await;
            }

            scripted.result.map_err(ClientError::Transport)
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str) -> ClientResult<TransportResponse> {
            self.answer(Method::Get, url, None).await
        }

        async fn post_json(
            &self,
            url: &str,
            body: serde_json::Value,
        ) -> ClientResult<TransportResponse> {
            self.answer(Method::Post, url, Some(body)).await
        }
    }
}
