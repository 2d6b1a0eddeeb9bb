//! Session-authenticated connection.
//!
//! `SessionConnection` owns the session token for one account and hides the
//! login / logout / expiry cycle behind [`SessionConnection::execute`].
//!
//! ## Concurrency
//!
//! The token sits behind an async mutex. The lock is held while checking for
//! a token, logging in, and refreshing an expired one, and released before
//! the request itself goes out, so authenticated requests can run in
//! parallel on a shared connection.

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

use acslib_ccure_client::{
    CcureHttpClient, ClientConfig, Error, ErrorKind, RequestEnvelope, ResponseEnvelope, Result,
    SESSION_HEADER,
};

use crate::credentials::CcureConfig;

/// Attempts `execute` makes by default: the first try plus one retry after
/// re-authenticating.
pub const DEFAULT_ATTEMPTS: u32 = 2;

/// Authentication state of one connection.
#[derive(Default)]
pub struct Session {
    token: Option<String>,
    authenticated: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("authenticated", &self.authenticated)
            .finish()
    }
}

impl Session {
    /// The held token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns true while a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn set(&mut self, token: String) {
        self.token = Some(token);
        self.authenticated = true;
    }

    fn clear(&mut self) -> Option<String> {
        self.authenticated = false;
        self.token.take()
    }
}

/// Version strings reported by the server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerVersions {
    #[serde(rename = "webServiceVersion")]
    pub web_service_version: Option<String>,
    #[serde(rename = "appServerVersion")]
    pub app_server_version: Option<String>,
}

/// Connection to one C•CURE account with transparent re-authentication.
#[derive(Debug)]
pub struct SessionConnection {
    http: CcureHttpClient,
    config: CcureConfig,
    session: Mutex<Session>,
}

impl SessionConnection {
    /// Create an unauthenticated connection. No network traffic happens
    /// until the first request or an explicit [`login`](Self::login).
    pub fn new(config: CcureConfig) -> Result<Self> {
        let client_config = ClientConfig::builder()
            .with_timeout(config.timeout())
            .with_connect_timeout(config.timeout())
            .build();
        Self::with_client_config(config, client_config)
    }

    /// Create a connection with custom HTTP settings.
    pub fn with_client_config(config: CcureConfig, client_config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = CcureHttpClient::new(client_config)?;
        Ok(Self {
            http,
            config,
            session: Mutex::new(Session::default()),
        })
    }

    /// Get the account configuration.
    pub fn config(&self) -> &CcureConfig {
        &self.config
    }

    /// Get the underlying HTTP client, for building request envelopes.
    pub fn http(&self) -> &CcureHttpClient {
        &self.http
    }

    /// Full URL for an endpoint path.
    pub fn url(&self, endpoint: &str) -> String {
        self.config.url(endpoint)
    }

    /// Returns true while a session token is held.
    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    /// Log in and store the session token. Replaces any token already held.
    #[instrument(skip(self))]
    pub async fn login(&self) -> Result<String> {
        let result = {
            let mut session = self.session.lock().await;
            self.login_locked(&mut session).await
        };
        if result.is_err() {
            self.log_session_details(None).await;
        }
        result
    }

    /// Log out of the remote session and clear the local token.
    ///
    /// The local token is cleared even when the remote call fails; that
    /// failure is logged, not returned.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let failed = {
            let mut session = self.session.lock().await;
            self.logout_locked(&mut session).await
        };
        if let Some(token) = failed {
            self.log_session_details(Some(&token)).await;
        }
    }

    /// The current session token, logging in first if none is held.
    pub async fn session_id(&self) -> Result<String> {
        let result = {
            let mut session = self.session.lock().await;
            match session.token() {
                Some(token) => return Ok(token.to_string()),
                None => self.login_locked(&mut session).await,
            }
        };
        if result.is_err() {
            self.log_session_details(None).await;
        }
        result
    }

    /// Ping the server so the session does not expire from inactivity.
    ///
    /// On failure the session is logged out so the next request logs in
    /// again, and the failure is returned. A session that was already
    /// replaced while the ping was in flight is left alone. Meant to be called on a fixed
    /// interval by an external scheduler.
    #[instrument(skip(self))]
    pub async fn keepalive(&self) -> Result<()> {
        let token = self.session_id().await?;
        debug!(session = %token_hint(&token), "Keeping session alive");

        let request = self
            .http
            .post(self.url(&self.config.endpoints().keepalive))
            .header(SESSION_HEADER, &token)
            .header("Access-Control-Expose-Headers", SESSION_HEADER);

        match self.http.send(&request).await {
            Ok(_) => {
                debug!(session = %token_hint(&token), "Session kept alive");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Error keeping session alive");
                self.log_session_details(Some(&token)).await;
                self.invalidate(&token).await;
                Err(err)
            }
        }
    }

    /// Execute a request with the default number of attempts.
    pub async fn execute(&self, request: RequestEnvelope) -> Result<ResponseEnvelope> {
        self.execute_with_attempts(request, DEFAULT_ATTEMPTS).await
    }

    /// Execute a request, re-authenticating when the session has expired.
    ///
    /// 1. Log in if no token is held, then inject the token.
    /// 2. Send.
    /// 3. Any failure other than an expired session, or an expired session on
    ///    the last attempt, is returned as is.
    /// 4. An expired session with attempts left logs out, logs in again,
    ///    re-injects the fresh token and goes back to 2.
    ///
    /// A session that is still expired on the last attempt is cleared before
    /// the error is returned. An `attempts` of 0 is treated as 1.
    #[instrument(skip(self, request), fields(method = ?request.method(), url = %request.url()))]
    pub async fn execute_with_attempts(
        &self,
        mut request: RequestEnvelope,
        attempts: u32,
    ) -> Result<ResponseEnvelope> {
        let mut remaining = attempts.max(1);
        let mut token = self.session_id().await?;
        request.set_header(SESSION_HEADER, &token);

        loop {
            let err = match self.http.send(&request).await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            if !err.is_session_expired() {
                return Err(err);
            }

            if remaining == 1 {
                warn!(error = %err, "Session expired and no attempts remain");
                self.invalidate(&token).await;
                return Err(err);
            }

            remaining -= 1;
            warn!(remaining, "Session expired, re-authenticating");
            token = self.refresh(&token).await?;
            request.set_header(SESSION_HEADER, &token);
        }
    }

    /// Fetch the server's version strings.
    #[instrument(skip(self))]
    pub async fn versions(&self) -> Result<ServerVersions> {
        let request = self.http.post(self.url(&self.config.endpoints().versions));
        self.http.send(&request).await?.json_as()
    }

    /// Replace an expired token with a fresh one.
    ///
    /// If another caller already replaced `stale`, its token is reused
    /// instead of logging in again.
    async fn refresh(&self, stale: &str) -> Result<String> {
        let (failed_logout, result) = {
            let mut session = self.session.lock().await;
            if let Some(current) = session.token() {
                if current != stale {
                    debug!("Session already refreshed by another request");
                    return Ok(current.to_string());
                }
            }
            let failed_logout = self.logout_locked(&mut session).await;
            (failed_logout, self.login_locked(&mut session).await)
        };
        if failed_logout.is_some() || result.is_err() {
            self.log_session_details(failed_logout.as_deref()).await;
        }
        result
    }

    /// Clear the session if it still holds `stale`.
    async fn invalidate(&self, stale: &str) {
        let failed = {
            let mut session = self.session.lock().await;
            if session.token() != Some(stale) {
                debug!("Session already replaced, keeping it");
                return;
            }
            self.logout_locked(&mut session).await
        };
        if let Some(token) = failed {
            self.log_session_details(Some(&token)).await;
        }
    }

    /// Log in while holding the session lock. A failed login also logs out
    /// of any session still held.
    async fn login_locked(&self, session: &mut Session) -> Result<String> {
        let request = self
            .http
            .post(self.url(&self.config.endpoints().login))
            .form_pairs(&self.config.connection_data())?;

        let result = match self.http.send(&request).await {
            Ok(response) => match response.header(SESSION_HEADER) {
                Some(token) => Ok(token.to_string()),
                None => Err(Error::new(ErrorKind::LoginFailed {
                    status: response.status(),
                    message: format!("login response carried no {SESSION_HEADER} header"),
                })),
            },
            Err(err) => Err(login_error(err)),
        };

        match result {
            Ok(token) => {
                debug!(session = %token_hint(&token), "Fetched new session ID");
                session.set(token.clone());
                Ok(token)
            }
            Err(err) => {
                error!(error = %err, username = %self.config.username(), "Error fetching session ID");
                self.logout_locked(session).await;
                Err(err)
            }
        }
    }

    /// Log out while holding the session lock. Returns the token when the
    /// remote logout failed.
    async fn logout_locked(&self, session: &mut Session) -> Option<String> {
        let token = session.clear()?;

        debug!(session = %token_hint(&token), "Logging out of session");
        let request = self
            .http
            .post(self.url(&self.config.endpoints().logout))
            .header(SESSION_HEADER, &token);

        let failed = match self.http.send(&request).await {
            Ok(_) => None,
            Err(err) => {
                error!(error = %err, "Error logging out of session");
                Some(token.clone())
            }
        };
        debug!(session = %token_hint(&token), "Removed session ID");
        failed
    }

    /// Log the session and server versions to help diagnose a failure.
    /// Never called with the session lock held.
    async fn log_session_details(&self, token: Option<&str>) {
        error!(session = %token.map(token_hint).unwrap_or_default(), "Session details");
        match self.versions().await {
            Ok(versions) => debug!(
                web_service = versions.web_service_version.as_deref().unwrap_or("unknown"),
                app_server = versions.app_server_version.as_deref().unwrap_or("unknown"),
                "Server versions"
            ),
            Err(err) => debug!(error = %err, "Could not get server version numbers"),
        }
    }
}

/// Turn an HTTP failure of the login call into `LoginFailed`. Transport
/// failures keep their own kind.
fn login_error(err: Error) -> Error {
    let Error { kind, source } = err;
    let kind = match kind {
        ErrorKind::SessionExpired(message) => ErrorKind::LoginFailed {
            status: 401,
            message,
        },
        ErrorKind::Http { status, message } => ErrorKind::LoginFailed { status, message },
        other => other,
    };
    Error { kind, source }
}

/// Short prefix of a token, safe to log.
fn token_hint(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    format!("{prefix}...")
}
