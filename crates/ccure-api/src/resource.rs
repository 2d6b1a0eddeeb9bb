//! Generic object operations over a session connection.
//!
//! Searches go out as JSON; every write (create, add child, update, remove
//! children) goes out form-encoded. Deletes carry no body.

use std::fmt::Display;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};

use acslib_ccure_auth::{CcureConfig, SessionConnection};
use acslib_ccure_client::{Error, ErrorKind, Result};

use crate::filter::SearchFilter;

/// One `FindObjsWithCriteriaFilter` call.
///
/// Page numbers start at 1 and are never advanced automatically. Extra
/// options are merged into the body last, so they can override any default
/// field.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    object_type: String,
    terms: Vec<String>,
    page_size: Option<u32>,
    page_number: u32,
    where_clause: Option<String>,
    options: Map<String, Value>,
}

impl SearchRequest {
    /// Search all objects of a type on page 1 with the configured page size.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            terms: Vec::new(),
            page_size: None,
            page_number: 1,
            where_clause: None,
            options: Map::new(),
        }
    }

    pub fn terms<T: Display>(mut self, terms: &[T]) -> Self {
        self.terms = terms.iter().map(ToString::to_string).collect();
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn page_number(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    /// Send this WHERE clause instead of compiling one from the terms.
    pub fn where_clause(mut self, clause: impl Into<String>) -> Self {
        self.where_clause = Some(clause.into());
        self
    }

    /// Add a vendor option such as `CountOnly`.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Build the JSON request body.
    pub fn body(&self, filter: &SearchFilter, default_page_size: u32) -> Result<Value> {
        let where_clause = match &self.where_clause {
            Some(clause) => clause.clone(),
            None => filter.filter(&self.terms)?,
        };

        let mut body = Map::new();
        body.insert("TypeFullName".into(), json!(self.object_type));
        body.insert(
            "pageSize".into(),
            json!(self.page_size.unwrap_or(default_page_size)),
        );
        body.insert("pageNumber".into(), json!(self.page_number));
        body.insert(
            "DisplayProperties".into(),
            json!(filter.display_properties()),
        );
        body.insert("WhereClause".into(), json!(where_clause));
        for (key, value) in &self.options {
            body.insert(key.clone(), value.clone());
        }
        Ok(Value::Object(body))
    }
}

/// Object operations shared by every C•CURE type.
///
/// Holds the session connection behind an `Arc` so several clients (and
/// tasks) can share one session.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    connection: Arc<SessionConnection>,
}

impl ResourceClient {
    pub fn new(connection: Arc<SessionConnection>) -> Self {
        Self { connection }
    }

    /// Create a client with its own connection.
    pub fn from_config(config: CcureConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(SessionConnection::new(config)?)))
    }

    pub fn connection(&self) -> &Arc<SessionConnection> {
        &self.connection
    }

    pub fn config(&self) -> &CcureConfig {
        self.connection.config()
    }

    /// Search for objects.
    ///
    /// Returns the decoded payload: a list of rows, or the raw count when
    /// `CountOnly` is set. Use [`count`](Self::count) for counts.
    #[instrument(skip(self, request, filter), fields(object_type = %request.object_type))]
    pub async fn search(&self, request: &SearchRequest, filter: &SearchFilter) -> Result<Value> {
        let body = request.body(filter, self.config().page_size())?;
        debug!(where_clause = ?body.get("WhereClause"), "Searching objects");

        let envelope = self
            .connection
            .http()
            .post(self.url(&self.config().endpoints().find_objs_with_criteria))
            .json_value(body);
        Ok(self.connection.execute(envelope).await?.into_json())
    }

    /// Count objects matching the terms.
    #[instrument(skip(self, terms, filter))]
    pub async fn count<T: Display + Sync>(
        &self,
        object_type: &str,
        terms: &[T],
        filter: &SearchFilter,
    ) -> Result<u64> {
        let request = SearchRequest::new(object_type)
            .terms(terms)
            .page_size(0)
            .option("CountOnly", true);

        let payload = self.search(&request, filter).await?;
        payload.as_u64().ok_or_else(|| unexpected_count(&payload))
    }

    /// Create a top-level object from a flat property map.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &Value) -> Result<Value> {
        info!("Creating object");
        self.persist(payload).await
    }

    /// Create one object under an existing parent.
    #[instrument(skip(self, child_properties))]
    pub async fn add_child(
        &self,
        parent_type: &str,
        parent_id: i64,
        child_type: &str,
        child_properties: &Map<String, Value>,
    ) -> Result<Value> {
        self.add_children(
            parent_type,
            parent_id,
            child_type,
            std::slice::from_ref(child_properties),
        )
        .await
    }

    /// Create several objects of one type under an existing parent in one
    /// request.
    #[instrument(skip(self, children), fields(count = children.len()))]
    pub async fn add_children(
        &self,
        parent_type: &str,
        parent_id: i64,
        child_type: &str,
        children: &[Map<String, Value>],
    ) -> Result<Value> {
        let children: Vec<Value> = children
            .iter()
            .map(|properties| {
                let (names, values) = split_properties(properties);
                json!({
                    "Type": child_type,
                    "PropertyNames": names,
                    "Propertyvalues": values,
                })
            })
            .collect();

        info!("Adding child objects");
        self.persist(&json!({
            "type": parent_type,
            "ID": parent_id,
            "Children": children,
        }))
        .await
    }

    /// Set properties on an existing object.
    #[instrument(skip(self, updates))]
    pub async fn update(
        &self,
        object_type: &str,
        object_id: i64,
        updates: &Map<String, Value>,
    ) -> Result<Value> {
        let (names, values) = split_properties(updates);
        let envelope = self
            .connection
            .http()
            .put(self.url(&self.config().endpoints().edit_object))
            .query("type", object_type)
            .query("id", object_id.to_string())
            .form_value(&json!({
                "PropertyNames": names,
                "PropertyValues": values,
            }))?;

        info!("Updating object");
        Ok(self.connection.execute(envelope).await?.into_json())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, object_type: &str, object_id: i64) -> Result<Value> {
        let envelope = self
            .connection
            .http()
            .delete(self.url(&self.config().endpoints().delete_object))
            .query("type", object_type)
            .query("id", object_id.to_string());

        info!("Deleting object");
        Ok(self.connection.execute(envelope).await?.into_json())
    }

    /// Remove child objects from a parent.
    #[instrument(skip(self, child_ids), fields(count = child_ids.len()))]
    pub async fn remove_children(
        &self,
        parent_type: &str,
        parent_id: i64,
        child_type: &str,
        child_ids: &[i64],
    ) -> Result<Value> {
        let children: Vec<Value> = child_ids
            .iter()
            .map(|id| json!({"Type": child_type, "ID": id}))
            .collect();

        let envelope = self
            .connection
            .http()
            .post(self.url(&self.config().endpoints().remove_from_container))
            .form_value(&json!({
                "type": parent_type,
                "ID": parent_id,
                "Children": children,
            }))?;

        info!("Removing child objects");
        Ok(self.connection.execute(envelope).await?.into_json())
    }

    /// Fetch one property of one object.
    ///
    /// Fails with `NotFound` when no object has the ID and with
    /// `MissingProperty` when the object has no such property.
    #[instrument(skip(self))]
    pub async fn get_property(
        &self,
        object_type: &str,
        object_id: i64,
        property: &str,
    ) -> Result<Value> {
        let filter = SearchFilter::exact("ObjectID", [property]);
        let request = SearchRequest::new(object_type)
            .terms(&[object_id])
            .page_size(1);

        let rows = self.search(&request, &filter).await?;
        let row = rows
            .as_array()
            .and_then(|rows| rows.first())
            .ok_or_else(|| {
                Error::new(ErrorKind::NotFound(format!(
                    "no {object_type} with ID {object_id}"
                )))
            })?;

        row.get(property).cloned().ok_or_else(|| {
            Error::new(ErrorKind::MissingProperty {
                property: property.to_string(),
            })
        })
    }

    async fn persist(&self, body: &Value) -> Result<Value> {
        let envelope = self
            .connection
            .http()
            .post(self.url(&self.config().endpoints().persist_to_container))
            .form_value(body)?;
        Ok(self.connection.execute(envelope).await?.into_json())
    }

    fn url(&self, endpoint: &str) -> String {
        self.connection.url(endpoint)
    }
}

/// Split a property map into aligned name and value lists.
pub(crate) fn split_properties(properties: &Map<String, Value>) -> (Vec<&String>, Vec<&Value>) {
    properties.iter().unzip()
}

fn unexpected_count(payload: &Value) -> Error {
    Error::new(ErrorKind::UnexpectedResponse(format!(
        "count returned a non-integer payload: {payload}"
    )))
}
