//! Personnel: people, their portraits and their clearance assignments.

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Map, Value};
use tracing::{info, instrument};

use acslib_ccure_client::{Error, ErrorKind, Result};

use crate::capability::AccessControlObject;
use crate::data::{to_properties, PersonnelCreateData};
use crate::filter::SearchFilter;
use crate::resource::{ResourceClient, SearchRequest};
use crate::types::{ImageType, ObjectType};

/// Client for Personnel objects.
#[derive(Debug, Clone)]
pub struct PersonnelClient {
    resource: ResourceClient,
    filter: SearchFilter,
}

impl PersonnelClient {
    pub fn new(resource: ResourceClient) -> Self {
        Self {
            resource,
            filter: SearchFilter::personnel(),
        }
    }

    /// Replace the default search filter.
    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Attach a primary portrait to a person.
    ///
    /// `image` is base64-encoded. The image name must be unique; when none is
    /// given it defaults to `<personnel_id>_<unix timestamp>`.
    #[instrument(skip(self, image))]
    pub async fn add_image(
        &self,
        personnel_id: i64,
        image: &str,
        image_name: Option<&str>,
        partition_id: i64,
    ) -> Result<Value> {
        let name = match image_name {
            Some(name) => name.to_string(),
            None => format!("{personnel_id}_{}", chrono::Utc::now().timestamp()),
        };

        let properties = json!({
            "Name": name,
            "ParentId": personnel_id,
            "ImageType": ImageType::Portrait.code(),
            "PartitionID": partition_id,
            "Primary": true,
            "Image": image,
        });
        let properties = to_properties(&properties)?;

        info!("Adding portrait");
        self.resource
            .add_child(
                ObjectType::Personnel.full_name(),
                personnel_id,
                ObjectType::Image.full_name(),
                &properties,
            )
            .await
    }

    /// Attach a primary portrait from raw image bytes.
    pub async fn add_image_bytes(
        &self,
        personnel_id: i64,
        image: &[u8],
        image_name: Option<&str>,
        partition_id: i64,
    ) -> Result<Value> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        self.add_image(personnel_id, &encoded, image_name, partition_id)
            .await
    }

    /// The person's base64-encoded primary portrait, or `None` if they have
    /// none.
    pub async fn get_image(&self, personnel_id: i64) -> Result<Option<String>> {
        let value = self
            .resource
            .get_property(
                ObjectType::Personnel.full_name(),
                personnel_id,
                "PrimaryPortrait",
            )
            .await?;

        match value {
            Value::Null => Ok(None),
            Value::String(image) => Ok(Some(image)),
            other => Err(Error::new(ErrorKind::UnexpectedResponse(format!(
                "PrimaryPortrait is not a string: {other}"
            )))),
        }
    }

    /// Assign clearances to a person.
    ///
    /// Sends one request per `clearance_limit` clearances and returns each
    /// response in order. An empty list sends nothing.
    #[instrument(skip(self, clearance_ids), fields(count = clearance_ids.len()))]
    pub async fn assign_clearances(
        &self,
        personnel_id: i64,
        clearance_ids: &[i64],
    ) -> Result<Vec<Value>> {
        let limit = self.resource.config().clearance_limit().max(1);
        let mut responses = Vec::new();

        for batch in clearance_ids.chunks(limit) {
            let children: Vec<Map<String, Value>> = batch
                .iter()
                .map(|clearance_id| {
                    let mut pair = Map::new();
                    pair.insert("PersonnelID".into(), json!(personnel_id));
                    pair.insert("ClearanceID".into(), json!(clearance_id));
                    pair
                })
                .collect();

            let response = self
                .resource
                .add_children(
                    ObjectType::Personnel.full_name(),
                    personnel_id,
                    ObjectType::ClearanceAssignment.full_name(),
                    &children,
                )
                .await?;
            responses.push(response);
        }

        Ok(responses)
    }

    /// Revoke clearances from a person.
    ///
    /// Looks up the matching clearance assignments, then removes them.
    /// Returns `Null` without removing anything when the person holds none
    /// of the clearances.
    #[instrument(skip(self, clearance_ids), fields(count = clearance_ids.len()))]
    pub async fn revoke_clearances(
        &self,
        personnel_id: i64,
        clearance_ids: &[i64],
    ) -> Result<Value> {
        if clearance_ids.is_empty() {
            return Ok(Value::Null);
        }

        let clearance_clause = clearance_ids
            .iter()
            .map(|id| format!("ClearanceID = {id}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let request = SearchRequest::new(ObjectType::ClearanceAssignment.full_name())
            .page_size(0)
            .where_clause(format!(
                "PersonnelID = {personnel_id} AND ({clearance_clause})"
            ));

        let rows = self
            .resource
            .search(
                &request,
                &SearchFilter::for_type(ObjectType::ClearanceAssignment),
            )
            .await?;
        let assignment_ids = object_ids(&rows)?;
        if assignment_ids.is_empty() {
            info!("No matching clearance assignments to revoke");
            return Ok(Value::Null);
        }

        self.resource
            .remove_children(
                ObjectType::Personnel.full_name(),
                personnel_id,
                ObjectType::ClearanceAssignment.full_name(),
                &assignment_ids,
            )
            .await
    }

    /// One page of the person's clearance assignments.
    pub async fn get_assigned_clearances(
        &self,
        personnel_id: i64,
        page_size: Option<u32>,
        page_number: u32,
    ) -> Result<Value> {
        let filter = SearchFilter::exact("PersonnelID", ["PersonnelID", "ClearanceID"]);
        let mut request = SearchRequest::new(ObjectType::ClearanceAssignment.full_name())
            .terms(&[personnel_id])
            .page_number(page_number);
        if let Some(page_size) = page_size {
            request = request.page_size(page_size);
        }
        self.resource.search(&request, &filter).await
    }
}

#[async_trait]
impl AccessControlObject for PersonnelClient {
    type CreateData = PersonnelCreateData;

    fn object_type(&self) -> ObjectType {
        ObjectType::Personnel
    }

    fn resource(&self) -> &ResourceClient {
        &self.resource
    }

    fn default_filter(&self) -> &SearchFilter {
        &self.filter
    }

    /// Create a person. `ClassType` is set to the Personnel type.
    async fn create(&self, data: &PersonnelCreateData) -> Result<Value> {
        let mut properties = to_properties(data)?;
        properties.insert(
            "ClassType".into(),
            json!(ObjectType::Personnel.full_name()),
        );
        self.resource.create(&Value::Object(properties)).await
    }
}

/// `ObjectID` of every row in a search result.
fn object_ids(rows: &Value) -> Result<Vec<i64>> {
    let rows = rows.as_array().ok_or_else(|| {
        Error::new(ErrorKind::UnexpectedResponse(
            "search did not return a list of objects".to_string(),
        ))
    })?;

    rows.iter()
        .map(|row| {
            row.get("ObjectID").and_then(Value::as_i64).ok_or_else(|| {
                Error::new(ErrorKind::MissingProperty {
                    property: "ObjectID".to_string(),
                })
            })
        })
        .collect()
}
