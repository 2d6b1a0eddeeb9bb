//! Clearances. Read-only through this API.

use async_trait::async_trait;
use serde_json::{Map, Value};

use acslib_ccure_client::{Error, Result};

use crate::capability::AccessControlObject;
use crate::filter::SearchFilter;
use crate::resource::{ResourceClient, SearchRequest};
use crate::types::ObjectType;

/// Client for Clearance objects.
///
/// Clearances can be searched and counted. Creating, updating and deleting
/// them fail with `ErrorKind::Unsupported` without contacting the server.
#[derive(Debug, Clone)]
pub struct ClearanceClient {
    resource: ResourceClient,
    filter: SearchFilter,
}

impl ClearanceClient {
    pub fn new(resource: ResourceClient) -> Self {
        Self {
            resource,
            filter: SearchFilter::clearance(),
        }
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    /// One page of the people a clearance is assigned to.
    pub async fn get_assignees(
        &self,
        clearance_id: i64,
        page_size: Option<u32>,
        page_number: u32,
    ) -> Result<Value> {
        let filter = SearchFilter::exact("ClearanceID", ["PersonnelID", "ClearanceID"]);
        let mut request = SearchRequest::new(ObjectType::ClearanceAssignment.full_name())
            .terms(&[clearance_id])
            .page_number(page_number);
        if let Some(page_size) = page_size {
            request = request.page_size(page_size);
        }
        self.resource.search(&request, &filter).await
    }

    fn unsupported(operation: &str) -> Error {
        Error::unsupported(operation, "clearances")
    }
}

#[async_trait]
impl AccessControlObject for ClearanceClient {
    type CreateData = Map<String, Value>;

    fn object_type(&self) -> ObjectType {
        ObjectType::Clearance
    }

    fn resource(&self) -> &ResourceClient {
        &self.resource
    }

    fn default_filter(&self) -> &SearchFilter {
        &self.filter
    }

    async fn create(&self, _data: &Map<String, Value>) -> Result<Value> {
        Err(Self::unsupported("create"))
    }

    async fn update(&self, _object_id: i64, _updates: &Map<String, Value>) -> Result<Value> {
        Err(Self::unsupported("update"))
    }

    async fn delete(&self, _object_id: i64) -> Result<Value> {
        Err(Self::unsupported("delete"))
    }
}
