//! # acslib
//!
//! A client library for the C•CURE 9000 access control API.
//!
//! Manage personnel, credentials, clearances, doors and elevators held in a
//! C•CURE server through its `victorwebservice` HTTP/JSON API.
//!
//! ## Security
//!
//! - Passwords and session tokens are redacted in Debug output
//! - Tracing spans skip credential parameters and log only a token prefix
//! - Error messages from the server are sanitized before they are surfaced
//!
//! ## Crates
//!
//! - **acslib-ccure-client** - HTTP transport, request/response envelopes, status mapping, form encoding
//! - **acslib-ccure-auth** - Account configuration and the session connection (login, logout, keepalive, re-authentication)
//! - **acslib-ccure-api** - WHERE-clause filter compiler, resource client and entity clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use acslib::{AccessControlObject, CcureConfig, PersonnelClient, ResourceClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // CCURE_BASE_URL, CCURE_USERNAME, CCURE_PASSWORD, CCURE_CLIENT_*
//!     let resource = ResourceClient::from_config(CcureConfig::from_env()?)?;
//!     let personnel = PersonnelClient::new(resource);
//!
//!     let people = personnel.search(&["lovelace"], None).await?;
//!     for person in people.as_array().into_iter().flatten() {
//!         println!("{} {}", person["FirstName"], person["LastName"]);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
pub use acslib_ccure_api as api;
pub use acslib_ccure_auth as auth;
pub use acslib_ccure_client as client;

pub use acslib_ccure_api::{
    AccessControlObject, BooleanOperator, ClearanceClient, ClearanceItemClient,
    ClearanceItemCreateData, ClearanceItemType, CredentialClient, CredentialCreateData, FuzzMatch,
    ImageType, ObjectType, PersonnelClient, PersonnelCreateData, ResourceClient, SearchFilter,
    SearchRequest, TermOperator,
};
pub use acslib_ccure_auth::{CcureConfig, Endpoints, SessionConnection};
pub use acslib_ccure_client::{Error, ErrorKind, Result};
