//! # ccure-api
//!
//! Object operations for the C•CURE 9000 `victorwebservice` API.
//!
//! ## Features
//!
//! - **Filter compiler** - turn search terms into the server's WHERE-clause
//!   grammar with per-field fuzzy matching
//! - **Resource client** - search, count, create, add children, update,
//!   remove children and delete for any object type
//! - **Entity clients** - personnel, clearances, credentials, doors and
//!   elevators behind one [`AccessControlObject`] trait
//!
//! Searches are sent as JSON and writes as form data. Every call goes through
//! a shared [`SessionConnection`](acslib_ccure_auth::SessionConnection), which
//! logs in on demand and re-authenticates once when the session expires.
//!
//! ## Example
//!
//! ```rust,ignore
//! use acslib_ccure_api::{AccessControlObject, PersonnelClient, PersonnelCreateData, ResourceClient};
//! use acslib_ccure_auth::CcureConfig;
//!
//! let resource = ResourceClient::from_config(CcureConfig::from_env()?)?;
//! let personnel = PersonnelClient::new(resource);
//!
//! personnel.create(&PersonnelCreateData::new("Lovelace").with_first_name("Ada")).await?;
//! let people = personnel.search(&["lovelace"], None).await?;
//! let total = personnel.count(&["lovelace"], None).await?;
//! ```

mod capability;
mod clearance;
mod clearance_item;
mod credential;
mod data;
mod filter;
mod personnel;
mod resource;
mod types;

pub use capability::AccessControlObject;
pub use clearance::ClearanceClient;
pub use clearance_item::ClearanceItemClient;
pub use credential::CredentialClient;
pub use data::{ClearanceItemCreateData, CredentialCreateData, PersonnelCreateData};
pub use filter::{BooleanOperator, FuzzMatch, SearchFilter, TermOperator};
pub use personnel::PersonnelClient;
pub use resource::{ResourceClient, SearchRequest};
pub use types::{ClearanceItemType, ImageType, ObjectType};

pub use acslib_ccure_client::{Error, ErrorKind, Result};
