//! Response envelopes and status-code mapping.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// A successful (2xx) response: status, decoded JSON payload and headers.
///
/// Header names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    status: u16,
    json: serde_json::Value,
    headers: HashMap<String, String>,
}

impl ResponseEnvelope {
    /// Create a response envelope. Header names are normalized to lowercase.
    pub fn new(
        status: u16,
        json: serde_json::Value,
        headers: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self {
            status,
            json,
            headers,
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The decoded payload. An empty body decodes to `Null`.
    pub fn json(&self) -> &serde_json::Value {
        &self.json
    }

    /// Take ownership of the decoded payload.
    pub fn into_json(self) -> serde_json::Value {
        self.json
    }

    /// Deserialize the payload into a typed value.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.json.clone())?)
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// All headers, lowercased names.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

/// Decode a 2xx body. Whitespace-only bodies become `Null`.
pub(crate) fn decode_body(body: &str) -> Result<serde_json::Value> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Convert a non-2xx status and its body text into the matching error.
///
/// - 401: the session token was rejected
/// - 5xx: reported as a client-side 400 carrying the body
/// - anything else: status and body unchanged
pub(crate) fn status_error(status: u16, body: &str) -> Error {
    let message = sanitize_error_message(body);
    let kind = match status {
        401 => ErrorKind::SessionExpired(message),
        500..=599 => ErrorKind::Http {
            status: 400,
            message,
        },
        _ => ErrorKind::Http { status, message },
    };
    Error::new(kind)
}

static SESSION_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r#"(?i)(session-?id["']?\s*[:=]\s*["']?)[A-Za-z0-9\-]{8,}"#)
        .expect("session pattern is valid")
});

static PASSWORD_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r#"(?i)(password["']?\s*[:=]\s*["']?)[^&"',\s]+"#)
        .expect("password pattern is valid")
});

/// Sanitize an error message to prevent exposing sensitive data.
///
/// This function:
/// - Redacts session ids
/// - Redacts password fields echoed back by the server
/// - Truncates messages longer than 500 characters
pub(crate) fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let sanitized = SESSION_PATTERN.replace_all(message, "${1}[REDACTED]");
    let mut sanitized = PASSWORD_PATTERN
        .replace_all(&sanitized, "${1}[REDACTED]")
        .into_owned();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
