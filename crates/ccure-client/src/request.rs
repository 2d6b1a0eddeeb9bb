//! Request envelopes.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::form;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request body content.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as `application/json`.
    Json(serde_json::Value),
    /// Already URL-encoded `application/x-www-form-urlencoded` text.
    Form(String),
}

/// One outbound call: target, verb, headers, body, query and timeout.
///
/// Built fresh for every call. The only change made after the first dispatch
/// is re-injecting a refreshed session token through [`set_header`].
///
/// [`set_header`]: RequestEnvelope::set_header
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) query_params: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) timeout: Option<Duration>,
}

impl RequestEnvelope {
    /// Create a new request envelope.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query_params: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace a header in place.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Set JSON body.
    pub fn json<T: Serialize>(self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        Ok(self.json_value(value))
    }

    /// Set raw JSON body.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self
    }

    /// Set a flat form body from name/value pairs.
    pub fn form_pairs<K, V>(self, pairs: &[(K, V)]) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect();
        let encoded = serde_urlencoded::to_string(&pairs)?;
        Ok(self.form_encoded(encoded))
    }

    /// Set a form body from a structured JSON object, using the vendor's
    /// bracketed key flattening (see [`form::encode_form`]).
    pub fn form_value(self, body: &serde_json::Value) -> Result<Self> {
        let encoded = form::encode_form(body)?;
        Ok(self.form_encoded(encoded))
    }

    /// Set an already-encoded form body.
    pub fn form_encoded(mut self, encoded: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Form(encoded.into()));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        self
    }

    /// Override the client's timeout for each attempt of this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The HTTP verb.
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// The target URL, without query parameters.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// All headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// A single header value.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Query parameters in insertion order.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// The body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// The per-request timeout override, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
