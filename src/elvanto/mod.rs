pub mod api;
pub mod oauth2;

use std::time::Duration;

pub const API_ENDPOINT: &str = "https://api.elvanto.com/v1";
pub const OAUTH_URL: &str = "https://api.elvanto.com/oauth";
pub const OAUTH_TOKEN_URL: &str = "https://api.elvanto.com/oauth/token";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoints and transport settings shared by every request of a [`Client`].
///
/// The default points at the production Elvanto api with fixed 10 seconds timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_endpoint: String,
    pub oauth_url: String,
    pub oauth_token_url: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_endpoint: API_ENDPOINT.to_owned(),
            oauth_url: OAUTH_URL.to_owned(),
            oauth_token_url: OAUTH_TOKEN_URL.to_owned(),
            connect_timeout: DEFAULT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("elvanto-api-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Same layout as the production api (`/v1`, `/oauth`, `/oauth/token`) under another host.
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        Self {
            api_endpoint: format!("{base_url}/v1"),
            oauth_url: format!("{base_url}/oauth"),
            oauth_token_url: format!("{base_url}/oauth/token"),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub(self) client: reqwest::Client,
    pub(self) config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> api::ApiResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                api::Error::configuration_error(format!("unable to build http client: {err}"))
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum DeserializedResponse<T> {
    Success(T),
    Error(serde_json::Value),
}

impl<T> DeserializedResponse<T> {
    pub fn into_result(self) -> Result<T, serde_json::Value> {
        match self {
            DeserializedResponse::Success(x) => Ok(x),
            DeserializedResponse::Error(e) => Err(e),
        }
    }
}
