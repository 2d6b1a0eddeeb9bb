//! Credentials (badges and cards) held by personnel.

use async_trait::async_trait;
use serde_json::Value;

use acslib_ccure_client::Result;

use crate::capability::AccessControlObject;
use crate::data::{to_properties, CredentialCreateData};
use crate::filter::SearchFilter;
use crate::resource::ResourceClient;
use crate::types::ObjectType;

/// Client for Credential objects.
///
/// A credential always belongs to a person, so creating one adds it as a
/// child of the Personnel object named in the create data.
#[derive(Debug, Clone)]
pub struct CredentialClient {
    resource: ResourceClient,
    filter: SearchFilter,
}

impl CredentialClient {
    pub fn new(resource: ResourceClient) -> Self {
        Self {
            resource,
            filter: SearchFilter::credential(),
        }
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[async_trait]
impl AccessControlObject for CredentialClient {
    type CreateData = CredentialCreateData;

    fn object_type(&self) -> ObjectType {
        ObjectType::Credential
    }

    fn resource(&self) -> &ResourceClient {
        &self.resource
    }

    fn default_filter(&self) -> &SearchFilter {
        &self.filter
    }

    async fn create(&self, data: &CredentialCreateData) -> Result<Value> {
        let properties = to_properties(data)?;
        self.resource
            .add_child(
                ObjectType::Personnel.full_name(),
                data.personnel_id,
                ObjectType::Credential.full_name(),
                &properties,
            )
            .await
    }
}
