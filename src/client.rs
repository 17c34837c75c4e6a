use std::{fmt, sync::Arc, time::Duration};

use reqwest::{header, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::{
    decode,
    error::NetworkError,
    logger::{Logger, NoopLogger},
    ApiRequest, ClientOptions, ManapoolError, RateLimiter, Result, DEFAULT_BASE_URL,
};

/// Header carrying the API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-ManaPool-Access-Token";
/// Header carrying the account email.
pub const EMAIL_HEADER: &str = "X-ManaPool-Email";

const ACCESS_TOKEN_ENV: &str = "MANAPOOL_ACCESS_TOKEN";
const EMAIL_ENV: &str = "MANAPOOL_EMAIL";
const BASE_URL_ENV: &str = "MANAPOOL_BASE_URL";

#[derive(Clone)]
/// HTTP client for the Manapool seller API.
///
/// Cheap to clone. Clones share the connection pool and the rate limiter.
pub struct ManapoolClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    email: String,
    options: ClientOptions,
    limiter: Arc<RateLimiter>,
    logger: Arc<dyn Logger>,
    cancel: CancellationToken,
}

impl fmt::Debug for ManapoolClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManapoolClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("email", &self.email)
            .field("options", &self.options)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl ManapoolClient {
    /// Creates a client against the production API with default options.
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            token: token.into(),
            email: email.into(),
            options: ClientOptions::default(),
            limiter: Arc::new(RateLimiter::default()),
            logger: Arc::new(NoopLogger),
            cancel: CancellationToken::new(),
        }
    }

    /// Starts a builder for a client with custom options, base URL,
    /// transport, logger or shared limiter.
    ///
    /// ```no_run
    /// use std::time::Duration;
    ///
    /// use manapool_http::{ClientOptions, ManapoolClient};
    ///
    /// let client = ManapoolClient::builder("token", "seller@example.com")
    ///     .options(ClientOptions::default().with_timeout(Duration::from_secs(60)))
    ///     .build()
    ///     .expect("valid options");
    /// ```
    pub fn builder(token: impl Into<String>, email: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token, email)
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `MANAPOOL_ACCESS_TOKEN` (required)
    /// - `MANAPOOL_EMAIL` (required)
    /// - `MANAPOOL_BASE_URL` (optional, defaults to the production API)
    ///
    /// A missing or empty required variable is a validation error naming it.
    pub fn from_env() -> Result<Self> {
        let token = required_env(ACCESS_TOKEN_ENV)?;
        let email = required_env(EMAIL_ENV)?;
        let mut builder = Self::builder(token, email);
        if let Some(base_url) = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    /// Returns a clone whose calls observe `token`.
    ///
    /// Cancelling it ends any pending wait or exchange of that clone with a
    /// cancelled network error.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            cancel: token,
            ..self.clone()
        }
    }

    /// Token that cancels this client's waits and exchanges.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Normalized base URL, always ending with `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Options the client was built with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Limiter shared by every clone of this client.
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub(crate) fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    /// Executes `request` and decodes a JSON body into `T`.
    ///
    /// An empty 2xx body yields `T::default()`.
    pub async fn call<T>(&self, request: ApiRequest) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = self.execute(&request).await?;
        let decoded = decode::decode_response(response, self.logger()).await?;
        Ok(decoded.unwrap_or_default())
    }

    /// Executes `request` and only checks the response status.
    pub async fn call_empty(&self, request: ApiRequest) -> Result<()> {
        let response = self.execute(&request).await?;
        decode::decode_empty(response, self.logger()).await
    }

    /// Sends `request` under the rate limiter, retrying transport failures and
    /// 5xx responses with exponential backoff.
    ///
    /// Returns the first response below 500, or the last 5xx response once
    /// retries are exhausted. The caller owns the returned body.
    pub async fn execute(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let url = self.request_url(request)?;
        let backoff = self.options.backoff();
        let max_attempts = backoff.max_attempts();
        let mut delays = backoff.delays();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            self.limiter
                .acquire(&self.cancel)
                .await
                .map_err(|_| NetworkError::cancelled("rate limiter wait cancelled"))?;

            let http_request = self.build_request(request, url.clone())?;
            self.logger.debug(format_args!(
                "API request: {} {url} (attempt {attempt}/{max_attempts})",
                request.method
            ));

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Err(NetworkError::cancelled("request cancelled").into());
                }
                outcome = self.http.execute(http_request) => outcome,
            };

            match outcome {
                Ok(response) if response.status().as_u16() < 500 => return Ok(response),
                Ok(response) => {
                    let Some(delay) = delays.next() else {
                        return Ok(response);
                    };
                    self.logger.error(format_args!(
                        "Server error {} (attempt {attempt}/{max_attempts}), retrying in {delay:?}",
                        response.status().as_u16()
                    ));
                    drop(response);
                    self.wait_before_retry(delay).await?;
                }
                Err(err) => {
                    self.logger.error(format_args!(
                        "Request failed (attempt {attempt}/{max_attempts}): {err}"
                    ));
                    if self.cancel.is_cancelled() {
                        return Err(NetworkError::cancelled("request cancelled").into());
                    }
                    match delays.next() {
                        Some(delay) => self.wait_before_retry(delay).await?,
                        None => {
                            return Err(NetworkError::new("request failed after retries", err).into())
                        }
                    }
                }
            }
        }
    }

    fn request_url(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.relative_path()))
            .map_err(|err| NetworkError::new("failed to create request", err))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    fn build_request(&self, request: &ApiRequest, url: Url) -> Result<reqwest::Request> {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .header(EMAIL_HEADER, &self.email)
            .header(header::USER_AGENT, &self.options.user_agent)
            .header(header::ACCEPT, "application/json")
            .timeout(self.options.timeout);

        if let Some(body) = &request.body {
            builder = builder
                .header(header::CONTENT_TYPE, &body.content_type)
                .body(body.bytes.clone());
        }

        builder
            .build()
            .map_err(|err| NetworkError::new("failed to create request", err).into())
    }

    /// Sleeps for `delay` unless the client is cancelled first.
    async fn wait_before_retry(&self, delay: Duration) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(NetworkError::cancelled("request cancelled").into()),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

/// Builder returned by [`ManapoolClient::builder`].
pub struct ClientBuilder {
    token: String,
    email: String,
    base_url: String,
    options: ClientOptions,
    http: Option<reqwest::Client>,
    logger: Option<Arc<dyn Logger>>,
    limiter: Option<Arc<RateLimiter>>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("email", &self.email)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            options: ClientOptions::default(),
            http: None,
            logger: None,
            limiter: None,
        }
    }

    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides the API root. A trailing `/` is added when missing.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    /// Uses a preconfigured transport, e.g. one with a proxy.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Shares an existing limiter instead of building one from the options.
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn build(self) -> Result<ManapoolClient> {
        self.options.validate()?;
        let limiter = match self.limiter {
            Some(limiter) => limiter,
            None => Arc::new(RateLimiter::new(
                self.options.rate_limit,
                self.options.rate_burst,
            )?),
        };

        Ok(ManapoolClient {
            http: self.http.unwrap_or_default(),
            base_url: self.base_url,
            token: self.token,
            email: self.email,
            options: self.options,
            limiter,
            logger: self.logger.unwrap_or_else(|| Arc::new(NoopLogger)),
            cancel: CancellationToken::new(),
        })
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    }
}

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(ManapoolError::validation(
            name,
            format!("{name} is set but empty"),
        )),
        Err(_) => Err(ManapoolError::validation(
            name,
            format!("missing {name} environment variable"),
        )),
    }
}
