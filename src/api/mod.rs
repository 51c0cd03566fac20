//! Banking backend API
//!
//! ## Architecture
//!
//! - **Endpoints**: logical operation → method + URL
//! - **Transport**: raw HTTP seam (`reqwest` in production)
//! - **Envelope**: `{success, message, data}` decoding
//! - **BankClient**: typed operations on top of the three

mod client;
mod endpoints;
mod envelope;
mod transport;

pub use client::BankClient;
pub use endpoints::{Endpoint, Endpoints, Method, DEFAULT_API_BASE};
pub use envelope::Envelope;
pub use transport::{HttpTransport, Transport, TransportResponse};

#[cfg(test)]
pub(crate) use transport::testing;
