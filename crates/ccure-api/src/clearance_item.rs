//! Clearance items: doors and elevators.

use async_trait::async_trait;
use serde_json::Value;

use acslib_ccure_client::Result;

use crate::capability::AccessControlObject;
use crate::data::{to_properties, ClearanceItemCreateData};
use crate::filter::SearchFilter;
use crate::resource::ResourceClient;
use crate::types::{ClearanceItemType, ObjectType};

/// Client for one kind of clearance item.
///
/// New items are added as children of an iStarController.
#[derive(Debug, Clone)]
pub struct ClearanceItemClient {
    resource: ResourceClient,
    item_type: ClearanceItemType,
    filter: SearchFilter,
}

impl ClearanceItemClient {
    pub fn new(resource: ResourceClient, item_type: ClearanceItemType) -> Self {
        Self {
            resource,
            item_type,
            filter: SearchFilter::clearance_item(),
        }
    }

    pub fn doors(resource: ResourceClient) -> Self {
        Self::new(resource, ClearanceItemType::Door)
    }

    pub fn elevators(resource: ResourceClient) -> Self {
        Self::new(resource, ClearanceItemType::Elevator)
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn item_type(&self) -> ClearanceItemType {
        self.item_type
    }
}

#[async_trait]
impl AccessControlObject for ClearanceItemClient {
    type CreateData = ClearanceItemCreateData;

    fn object_type(&self) -> ObjectType {
        self.item_type.object_type()
    }

    fn resource(&self) -> &ResourceClient {
        &self.resource
    }

    fn default_filter(&self) -> &SearchFilter {
        &self.filter
    }

    async fn create(&self, data: &ClearanceItemCreateData) -> Result<Value> {
        let properties = to_properties(data)?;
        self.resource
            .add_child(
                ObjectType::IStarController.full_name(),
                data.controller_id,
                self.object_type().full_name(),
                &properties,
            )
            .await
    }
}
