//! # ccure-auth
//!
//! Session authentication for the C•CURE 9000 `victorwebservice` API.
//!
//! C•CURE authenticates with a session token: a form POST of the account
//! credentials returns a `session-id` response header, and every later
//! request echoes it back in the same header. Sessions expire after a period
//! of inactivity, at which point the server answers 401.
//!
//! This crate provides:
//! - [`CcureConfig`]: base URL, credentials, client identity and the
//!   endpoint table, loadable from `CCURE_*` environment variables
//! - [`SessionConnection`]: login, logout, keepalive and an `execute` that
//!   logs in on demand and re-authenticates once when a session expires
//!
//! ## Example
//!
//! ```rust,ignore
//! use acslib_ccure_auth::{CcureConfig, SessionConnection};
//!
//! let connection = SessionConnection::new(CcureConfig::from_env()?)?;
//! connection.keepalive().await?;
//! println!("{:?}", connection.versions().await?);
//! connection.logout().await;
//! ```

mod credentials;
mod session;

pub use credentials::{CcureConfig, Endpoints};
pub use session::{ServerVersions, SessionConnection, DEFAULT_ATTEMPTS};

pub use acslib_ccure_client::{Error, ErrorKind, Result};
