use crate::Result;
use crate::models::{ApiError, Sender, User};
use indexmap::IndexMap;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

/// Base URL of the Mandrill users API
pub const DEFAULT_BASE_URL: &str = "https://mandrillapp.com/api/1.0/users";

/// Header that identifies this library to the service
pub const CLIENT_ID_HEADER: &str = "X-Custom-Header";

const DEFAULT_CLIENT_ID: &str = "mandrill-client";

/// Endpoints of the users API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Account details and sending statistics
    Info,
    /// Connectivity and key check
    Ping,
    /// Sender addresses used by the account
    Senders,
}

impl Endpoint {
    /// Returns the path of this endpoint relative to the base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Info => "info.json",
            Endpoint::Ping => "ping.json",
            Endpoint::Senders => "senders.json",
        }
    }
}

/// The JSON body of a request.
///
/// Always carries a string API key under `"key"`. Every call builds its own
/// envelope; adding a parameter yields a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestEnvelope {
    params: IndexMap<String, serde_json::Value>,
}

impl RequestEnvelope {
    /// Creates an envelope holding only the API key
    ///
    /// # Arguments
    ///
    /// * `key` - The Mandrill API key to authenticate with
    ///
    /// # Examples
    ///
    /// ```
    /// use mandrill_client::RequestEnvelope;
    ///
    /// let envelope = RequestEnvelope::new("your-api-key");
    /// assert_eq!(envelope.key(), Some("your-api-key"));
    /// assert_eq!(envelope.len(), 1);
    /// ```
    pub fn new(key: impl Into<String>) -> Self {
        let mut params = IndexMap::new();
        params.insert("key".to_string(), serde_json::Value::String(key.into()));
        Self { params }
    }

    /// Returns this envelope with an extra parameter
    ///
    /// Reusing a name replaces the earlier value. The key itself is fixed at
    /// construction: a `"key"` parameter is ignored here.
    ///
    /// # Arguments
    ///
    /// * `name` - The parameter name
    /// * `value` - Any value convertible to JSON
    ///
    /// # Returns
    ///
    /// The modified envelope for method chaining
    pub fn with(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let name = name.into();
        if name != "key" {
            self.params.insert(name, value.into());
        }
        self
    }

    /// Returns the value of a parameter, if set
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.params.get(name)
    }

    /// The API key
    pub fn key(&self) -> Option<&str> {
        self.params.get("key").and_then(|v| v.as_str())
    }

    /// Number of parameters, the key included
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Always `false` for envelopes built through this type
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl TryFrom<IndexMap<String, serde_json::Value>> for RequestEnvelope {
    type Error = MandrillError;

    fn try_from(params: IndexMap<String, serde_json::Value>) -> Result<Self> {
        match params.get("key").and_then(|v| v.as_str()) {
            Some(key) if !key.is_empty() => Ok(Self { params }),
            _ => Err(MandrillError::MissingKey),
        }
    }
}

impl<'de> Deserialize<'de> for RequestEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let params = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
        RequestEnvelope::try_from(params).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when using the Mandrill client
#[derive(Error, Debug)]
pub enum MandrillError {
    #[error("no API key supplied")]
    MissingKey,

    #[error("failed to encode request: {0}")]
    Marshal(#[source] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mandrill error {}: {}", .0.code, .0.message)]
    Remote(ApiError),

    #[error("non 200 status: {status} {reason}")]
    Http { status: u16, reason: String },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl MandrillError {
    /// Returns the service's error payload when this is a [`MandrillError::Remote`]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            MandrillError::Remote(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the service itself rejected the request
    pub fn is_remote(&self) -> bool {
        matches!(self, MandrillError::Remote(_))
    }
}

/// A client for the Mandrill users API
///
/// The client holds no credentials; every operation takes the API key it
/// should authenticate with. Each call is a single POST whose response is
/// decoded into a typed value or a [`MandrillError`].
#[derive(Debug, Clone)]
pub struct MandrillClient {
    client: Client,
    base_url: String,
    client_id: String,
}

impl Default for MandrillClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MandrillClient {
    /// Creates a client pointed at the public Mandrill API
    ///
    /// # Examples
    ///
    /// ```
    /// use mandrill_client::MandrillClient;
    ///
    /// let client = MandrillClient::new();
    /// assert_eq!(client.base_url(), "https://mandrillapp.com/api/1.0/users");
    /// ```
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base URL requests are sent to, without a trailing `/`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches account information and sending statistics
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The key is empty
    /// - The HTTP request fails
    /// - The service rejects the key or returns a non-200 status
    /// - The response is not a valid user record
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mandrill_client::MandrillClient;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mandrill_client::MandrillError> {
    /// let client = MandrillClient::new();
    /// let user = client.user_info("your-api-key").await?;
    /// println!("{} sent {} today", user.username, user.stats.today.sent);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn user_info(&self, key: &str) -> Result<User> {
        self.call(Endpoint::Info, &RequestEnvelope::new(key)).await
    }

    /// Validates the key and connectivity; the service answers `"PONG!"`
    ///
    /// # Errors
    ///
    /// Same as [`MandrillClient::user_info`], with the response decoded as a
    /// JSON string.
    pub async fn ping(&self, key: &str) -> Result<String> {
        self.call(Endpoint::Ping, &RequestEnvelope::new(key)).await
    }

    /// Lists the sender addresses used by the account, in the order the
    /// service returns them
    ///
    /// # Errors
    ///
    /// Same as [`MandrillClient::user_info`], with the response decoded as a
    /// list of senders.
    pub async fn senders(&self, key: &str) -> Result<Vec<Sender>> {
        self.call(Endpoint::Senders, &RequestEnvelope::new(key)).await
    }

    /// Sends an envelope to an endpoint and decodes the response as `T`
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The users API endpoint to call
    /// * `envelope` - The request body, carrying the API key
    ///
    /// # Returns
    ///
    /// The decoded response body on HTTP 200
    ///
    /// # Errors
    ///
    /// Returns `MandrillError::MissingKey` without sending anything when the
    /// envelope has no non-empty string key; otherwise as
    /// [`MandrillClient::user_info`].
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        envelope: &RequestEnvelope,
    ) -> Result<T> {
        if envelope.key().is_none_or(str::is_empty) {
            return Err(MandrillError::MissingKey);
        }
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let body = serde_json::to_vec(envelope).map_err(MandrillError::Marshal)?;

        debug!(endpoint = endpoint.path(), %url, "sending Mandrill request");
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(CLIENT_ID_HEADER, self.client_id.as_str())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!(endpoint = endpoint.path(), status = status.as_u16(), "received Mandrill response");

        if status != StatusCode::OK && status != StatusCode::INTERNAL_SERVER_ERROR {
            return decode_response(status, &[]);
        }
        let bytes = response.bytes().await?;
        decode_response(status, &bytes)
    }
}

/// Maps a status and body to a typed value or an error.
///
/// 200 decodes the body as `T`, 500 decodes it as the service's
/// [`ApiError`], and any other status is reported without reading the body.
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    match status {
        StatusCode::OK => serde_json::from_slice(body).map_err(MandrillError::Decode),
        StatusCode::INTERNAL_SERVER_ERROR => {
            let err: ApiError = serde_json::from_slice(body).map_err(MandrillError::Decode)?;
            Err(MandrillError::Remote(err))
        }
        other => Err(MandrillError::Http {
            status: other.as_u16(),
            reason: other.canonical_reason().unwrap_or_default().to_string(),
        }),
    }
}

/// Builder for configuring a [`MandrillClient`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    client_id: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Base URL `https://mandrillapp.com/api/1.0/users`
    /// - Client identifier `mandrill-client`
    /// - A fresh `reqwest::Client`
    pub fn new() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
        }
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the value sent in the client identifier header.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Use an existing `reqwest` client for transport.
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    ///
    /// No network traffic happens until the first call.
    pub fn build(self) -> MandrillClient {
        MandrillClient {
            client: self.client.unwrap_or_default(),
            base_url: self.base_url,
            client_id: self.client_id,
        }
    }
}
