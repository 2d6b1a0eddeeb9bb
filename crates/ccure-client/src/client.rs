//! HTTP transport: one attempt per call, failures mapped to typed errors.

use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBody, RequestEnvelope, RequestMethod};
use crate::response::{decode_body, status_error, ResponseEnvelope};

/// HTTP client for the victorwebservice API.
///
/// Sends exactly one attempt per [`send`](CcureHttpClient::send); retrying on
/// an expired session is the session connection's job.
#[derive(Debug, Clone)]
pub struct CcureHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl CcureHttpClient {
    /// Create a new HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a GET request envelope.
    pub fn get(&self, url: impl Into<String>) -> RequestEnvelope {
        RequestEnvelope::new(RequestMethod::Get, url)
    }

    /// Create a POST request envelope.
    pub fn post(&self, url: impl Into<String>) -> RequestEnvelope {
        RequestEnvelope::new(RequestMethod::Post, url)
    }

    /// Create a PUT request envelope.
    pub fn put(&self, url: impl Into<String>) -> RequestEnvelope {
        RequestEnvelope::new(RequestMethod::Put, url)
    }

    /// Create a DELETE request envelope.
    pub fn delete(&self, url: impl Into<String>) -> RequestEnvelope {
        RequestEnvelope::new(RequestMethod::Delete, url)
    }

    /// Send a request once.
    ///
    /// Returns the decoded response for 2xx statuses and a typed error for
    /// everything else, including transport failures.
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    pub async fn send(&self, request: &RequestEnvelope) -> Result<ResponseEnvelope> {
        let timeout = request.timeout.unwrap_or(self.config.timeout);

        let mut url = url::Url::parse(&request.url)?;
        if !request.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query_params);
        }

        let mut req = self
            .inner
            .request(request.method.to_reqwest(), url)
            .timeout(timeout);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = match body {
                RequestBody::Json(value) => req.json(value),
                RequestBody::Form(encoded) => req.body(encoded.clone()),
            };
        }

        if self.config.enable_tracing {
            debug!(method = ?request.method, url = %request.url, "Sending request");
        }

        let response = req
            .send()
            .await
            .map_err(|e| transport_error(e, timeout, self.config.connect_timeout))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout, self.config.connect_timeout))?;

        if self.config.enable_tracing {
            if (200..300).contains(&status) {
                debug!(status, content_length = body.len(), "Response received");
            } else {
                info!(status, content_length = body.len(), "Non-success response");
            }
        }

        if !(200..300).contains(&status) {
            return Err(status_error(status, &body));
        }

        let json = decode_body(&body)?;
        Ok(ResponseEnvelope::new(status, json, headers))
    }
}

/// Map a reqwest failure to its error kind, naming the timeout that elapsed.
fn transport_error(err: reqwest::Error, timeout: Duration, connect_timeout: Duration) -> Error {
    if err.is_timeout() {
        let kind = if err.is_connect() {
            ErrorKind::ConnectTimeout {
                timeout: connect_timeout,
            }
        } else {
            ErrorKind::ReadTimeout { timeout }
        };
        return Error::with_source(kind, err);
    }
    err.into()
}
