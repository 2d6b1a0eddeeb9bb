//! # ccure-client
//!
//! Core HTTP transport for the C•CURE 9000 `victorwebservice` API.
//!
//! This crate provides the foundational pieces every higher layer builds on:
//! - Request envelopes (URL, verb, headers, JSON or form body, query params, timeout)
//! - Response envelopes (status, decoded JSON payload, headers)
//! - Status-code mapping into a typed error taxonomy
//! - The vendor's bracketed form encoding used by write operations
//! - Sanitizing of server-provided error text
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Resource Layer                           │
//! │  (ccure-api: filters, ResourceClient, entity clients)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SessionConnection                         │
//! │  (ccure-auth: login / logout / keepalive / 401 retry)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CcureHttpClient                          │
//! │  - One HTTP attempt per call                                │
//! │  - Transport failures and statuses mapped to ErrorKind      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use acslib_ccure_client::{CcureHttpClient, ClientConfig, SESSION_HEADER};
//!
//! let http = CcureHttpClient::new(ClientConfig::default())?;
//! let request = http
//!     .post("https://ccure.example.com/victorwebservice/api/v2/session/keepalive")
//!     .header(SESSION_HEADER, session_id);
//! let response = http.send(&request).await?;
//! ```

mod client;
mod config;
mod error;
pub mod form;
mod request;
mod response;

pub use client::CcureHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestEnvelope, RequestMethod};
pub use response::ResponseEnvelope;

/// Header carrying the session token, both on the login response and on
/// every authenticated request.
pub const SESSION_HEADER: &str = "session-id";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("acslib/", env!("CARGO_PKG_VERSION"));
