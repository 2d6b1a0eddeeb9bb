//! Typed property sets for creating objects.
//!
//! Each type serializes to the flat property map the server expects. Any
//! property without a dedicated field goes in `extra`.

use serde::Serialize;
use serde_json::{Map, Value};

use acslib_ccure_client::{Error, Result};

/// Properties of a new Personnel object. `LastName` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonnelCreateData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersonnelCreateData {
    pub fn new(last_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = Some(middle_name.into());
        self
    }

    /// Set any other Personnel property, e.g. `Text1` or `PartitionID`.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Properties of a new Credential, created under the Personnel object
/// `personnel_id`.
///
/// The server saves `CHUID` as 0 unless `CardNumber` is also given, ignores
/// `Name`, and defaults `FacilityCode` to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialCreateData {
    #[serde(skip)]
    pub personnel_id: i64,
    #[serde(rename = "CHUID")]
    pub chuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialCreateData {
    pub fn new(personnel_id: i64, chuid: impl Into<String>) -> Self {
        Self {
            personnel_id,
            chuid: chuid.into(),
            ..Default::default()
        }
    }

    pub fn with_card_number(mut self, card_number: i64) -> Self {
        self.card_number = Some(card_number);
        self
    }

    pub fn with_facility_code(mut self, facility_code: i64) -> Self {
        self.facility_code = Some(facility_code);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Properties of a new door or elevator, created under the iStarController
/// object `controller_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClearanceItemCreateData {
    #[serde(skip)]
    pub controller_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClearanceItemCreateData {
    pub fn new(controller_id: i64, name: impl Into<String>) -> Self {
        Self {
            controller_id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Serialize create data into a property map.
pub(crate) fn to_properties<T: Serialize>(data: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(data)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::usage("create data must serialize to an object")),
    }
}
