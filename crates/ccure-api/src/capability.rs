//! The operations every entity client offers.

use std::fmt::Display;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use acslib_ccure_client::Result;

use crate::filter::SearchFilter;
use crate::resource::{ResourceClient, SearchRequest};
use crate::types::ObjectType;

/// Search, count, create, update and delete for one object type.
///
/// Search, count, update and delete have default implementations that
/// forward to the [`ResourceClient`]. Clients for types the server does not
/// let this API modify override the write operations to fail with
/// `ErrorKind::Unsupported` before anything is sent.
#[async_trait]
pub trait AccessControlObject: Send + Sync {
    /// What [`create`](Self::create) takes.
    type CreateData: Send + Sync;

    fn object_type(&self) -> ObjectType;

    fn resource(&self) -> &ResourceClient;

    /// Filter used when a search is given none.
    fn default_filter(&self) -> &SearchFilter;

    /// First page of objects matching the terms.
    async fn search<T: Display + Sync>(
        &self,
        terms: &[T],
        filter: Option<&SearchFilter>,
    ) -> Result<Value> {
        self.search_page(terms, filter, None, 1).await
    }

    /// One page of objects matching the terms. A `page_size` of `None` uses
    /// the configured default.
    async fn search_page<T: Display + Sync>(
        &self,
        terms: &[T],
        filter: Option<&SearchFilter>,
        page_size: Option<u32>,
        page_number: u32,
    ) -> Result<Value> {
        let filter = filter.unwrap_or_else(|| self.default_filter());
        let mut request = SearchRequest::new(self.object_type().full_name())
            .terms(terms)
            .page_number(page_number);
        if let Some(page_size) = page_size {
            request = request.page_size(page_size);
        }

        info!(object_type = %self.object_type(), "Searching");
        self.resource().search(&request, filter).await
    }

    /// Number of objects matching the terms.
    async fn count<T: Display + Sync>(
        &self,
        terms: &[T],
        filter: Option<&SearchFilter>,
    ) -> Result<u64> {
        let filter = filter.unwrap_or_else(|| self.default_filter());
        self.resource()
            .count(self.object_type().full_name(), terms, filter)
            .await
    }

    async fn create(&self, data: &Self::CreateData) -> Result<Value>;

    async fn update(&self, object_id: i64, updates: &Map<String, Value>) -> Result<Value> {
        self.resource()
            .update(self.object_type().full_name(), object_id, updates)
            .await
    }

    async fn delete(&self, object_id: i64) -> Result<Value> {
        self.resource()
            .delete(self.object_type().full_name(), object_id)
            .await
    }
}
