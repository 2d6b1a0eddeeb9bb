//! Account configuration: credentials, base URL and endpoint table.
//!
//! The password is redacted in Debug output.

use std::time::Duration;

use acslib_ccure_client::{Error, ErrorKind, Result};

/// Paths of the victorwebservice endpoints, relative to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub logout: String,
    pub keepalive: String,
    pub versions: String,
    pub find_objs_with_criteria: String,
    pub edit_object: String,
    pub persist_to_container: String,
    pub remove_from_container: String,
    pub delete_object: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::v2()
    }
}

impl Endpoints {
    /// Endpoint table for API version 2.
    pub fn v2() -> Self {
        Self {
            login: "/victorwebservice/api/Authenticate/Login".to_string(),
            logout: "/victorwebservice/api/Authenticate/Logout".to_string(),
            keepalive: "/victorwebservice/api/v2/session/keepalive".to_string(),
            versions: "/victorwebservice/api/Generic/Versions".to_string(),
            find_objs_with_criteria: "/victorwebservice/api/Objects/FindObjsWithCriteriaFilter"
                .to_string(),
            edit_object: "/victorwebservice/api/Objects/Put".to_string(),
            persist_to_container: "/victorwebservice/api/Objects/PersistToContainer".to_string(),
            remove_from_container: "/victorwebservice/api/Objects/RemoveFromContainer"
                .to_string(),
            delete_object: "/victorwebservice/api/Objects/Delete".to_string(),
        }
    }

    /// Endpoint table for a numbered API version.
    pub fn for_version(api_version: u32) -> Result<Self> {
        match api_version {
            2 => Ok(Self::v2()),
            other => Err(Error::new(ErrorKind::Config(format!(
                "Invalid API version: {other}"
            )))),
        }
    }
}

/// Account configuration for one C•CURE server.
#[derive(Clone)]
pub struct CcureConfig {
    base_url: String,
    username: String,
    password: String,
    client_name: String,
    client_version: String,
    client_id: String,
    endpoints: Endpoints,
    page_size: u32,
    clearance_limit: usize,
    timeout: Duration,
}

impl std::fmt::Debug for CcureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CcureConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("client_name", &self.client_name)
            .field("client_version", &self.client_version)
            .field("client_id", &self.client_id)
            .field("page_size", &self.page_size)
            .field("clearance_limit", &self.clearance_limit)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CcureConfig {
    /// Default number of rows requested per search page.
    pub const DEFAULT_PAGE_SIZE: u32 = 100;
    /// Default maximum number of clearances assigned in one request.
    pub const DEFAULT_CLEARANCE_LIMIT: usize = 40;
    /// Default per-attempt request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

    /// Create a configuration with the given server and account.
    ///
    /// Client identity fields start empty; set them with [`with_client`].
    ///
    /// [`with_client`]: CcureConfig::with_client
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            client_name: String::new(),
            client_version: String::new(),
            client_id: String::new(),
            endpoints: Endpoints::default(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            clearance_limit: Self::DEFAULT_CLEARANCE_LIMIT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the client identity sent at login.
    pub fn with_client(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        self.client_name = name.into();
        self.client_version = version.into();
        self.client_id = id.into();
        self
    }

    /// Replace the endpoint table.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the default search page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the clearance assignment limit.
    pub fn with_clearance_limit(mut self, limit: usize) -> Self {
        self.clearance_limit = limit;
        self
    }

    /// Set the per-attempt request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `CCURE_BASE_URL`
    /// - `CCURE_USERNAME`
    /// - `CCURE_PASSWORD`
    /// - `CCURE_CLIENT_NAME`
    /// - `CCURE_CLIENT_VERSION`
    /// - `CCURE_CLIENT_ID`
    ///
    /// Optional:
    /// - `CCURE_PAGE_SIZE` (default: 100)
    /// - `CCURE_CLEARANCE_LIMIT` (default: 40)
    /// - `CCURE_TIMEOUT` in seconds (default: 3)
    /// - `CCURE_API_VERSION` (default: 2)
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            required_var("CCURE_BASE_URL")?,
            required_var("CCURE_USERNAME")?,
            required_var("CCURE_PASSWORD")?,
        )
        .with_client(
            required_var("CCURE_CLIENT_NAME")?,
            required_var("CCURE_CLIENT_VERSION")?,
            required_var("CCURE_CLIENT_ID")?,
        );

        if let Some(page_size) = optional_var("CCURE_PAGE_SIZE")? {
            config.page_size = page_size;
        }
        if let Some(limit) = optional_var("CCURE_CLEARANCE_LIMIT")? {
            config.clearance_limit = limit;
        }
        if let Some(seconds) = optional_var::<f64>("CCURE_TIMEOUT")? {
            config.timeout = Duration::try_from_secs_f64(seconds).map_err(|e| {
                Error::new(ErrorKind::Config(format!("CCURE_TIMEOUT: {e}")))
            })?;
        }
        if let Some(version) = optional_var("CCURE_API_VERSION")? {
            config.endpoints = Endpoints::for_version(version)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL parses and the account fields are present.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;
        if self.username.is_empty() || self.password.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "username and password are required".to_string(),
            )));
        }
        Ok(())
    }

    /// Fields sent to the login endpoint.
    pub fn connection_data(&self) -> [(&'static str, &str); 5] {
        [
            ("UserName", self.username.as_str()),
            ("Password", self.password.as_str()),
            ("ClientName", self.client_name.as_str()),
            ("ClientVersion", self.client_version.as_str()),
            ("ClientID", self.client_id.as_str()),
        ]
    }

    /// Join the base URL and an endpoint path.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn clearance_limit(&self) -> usize {
        self.clearance_limit
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn required_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::new(ErrorKind::Config(format!(
            "Environment variable not set: {name}"
        )))),
    }
}

fn optional_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value
            .parse()
            .map(Some)
            .map_err(|e| Error::new(ErrorKind::Config(format!("{name}: {e}")))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CcureConfig {
        CcureConfig::new("https://ccure.example.com/", "svc", "s3cret")
            .with_client("acslib", "1.0", "b5e2d1c0")
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("svc"));
    }

    #[test]
    fn test_connection_data() {
        let config = config();
        let data = config.connection_data();
        assert_eq!(data[0], ("UserName", "svc"));
        assert_eq!(data[1], ("Password", "s3cret"));
        assert_eq!(data[2], ("ClientName", "acslib"));
        assert_eq!(data[3], ("ClientVersion", "1.0"));
        assert_eq!(data[4], ("ClientID", "b5e2d1c0"));
    }

    #[test]
    fn test_url_join_trims_trailing_slash() {
        let config = config();
        assert_eq!(
            config.url(&config.endpoints().login),
            "https://ccure.example.com/victorwebservice/api/Authenticate/Login"
        );
        assert_eq!(config.url("custom"), "https://ccure.example.com/custom");
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.page_size(), 100);
        assert_eq!(config.clearance_limit(), 40);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.endpoints(), &Endpoints::v2());
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());
        assert!(CcureConfig::new("not a url", "svc", "pw").validate().is_err());
        assert!(CcureConfig::new("https://ccure.example.com", "", "")
            .validate()
            .is_err());
    }

    #[test]
    fn test_unknown_api_version() {
        let err = Endpoints::for_version(3).unwrap_err();
        assert!(err.to_string().contains("Invalid API version: 3"));
    }
}
