use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::{client::MethodClient, ApiResult, Error, TransportErrorKind};
use crate::elvanto::{
    oauth2::{
        self,
        credentials::Credentials,
        token::{AuthorizationCode, RefreshToken, Token, TokenGenerator},
    },
    Client, ClientConfig,
};

/// Client for the Elvanto api.
///
/// Credentials are an immutable snapshot: every call reads the current one, a refresh swaps it for a new one.
#[derive(Debug)]
pub struct ElvantoClient {
    method_client: MethodClient,
    credentials: RwLock<Option<Credentials>>,
}

impl ElvantoClient {
    pub fn new(credentials: Credentials) -> ApiResult<Self> {
        let client = Client::new(ClientConfig::default())?;
        Ok(Self::with_client(client, Some(credentials)))
    }

    /// Client without credentials, enough for [`ElvantoClient::authorize_url`] and [`ElvantoClient::exchange_token`].
    pub fn no_auth() -> ApiResult<Self> {
        let client = Client::new(ClientConfig::default())?;
        Ok(Self::with_client(client, None))
    }

    pub fn with_client(client: Client, credentials: Option<Credentials>) -> Self {
        Self {
            method_client: MethodClient::new(client),
            credentials: RwLock::new(credentials),
        }
    }

    /// Credentials read from the environment, see [`Credentials::from_env`].
    pub fn from_env() -> ApiResult<Self> {
        Self::new(Credentials::from_env()?)
    }

    pub async fn credentials(&self) -> Option<Credentials> {
        self.credentials.read().await.clone()
    }

    pub async fn set_credentials(&self, credentials: Option<Credentials>) {
        *self.credentials.write().await = credentials;
    }

    /// Calls an api method (`people/getAll`, `groups/getInfo`...) and returns the decoded json response.
    ///
    /// `params` must serialize to a json object; `grant_type=client_credentials` is always added.
    pub async fn call<P>(&self, method: &str, params: &P) -> ApiResult<Value>
    where
        P: Serialize + ?Sized,
    {
        self.call_as(method, params).await
    }

    #[tracing::instrument(skip(self, params))]
    pub async fn call_as<P, R>(&self, method: &str, params: &P) -> ApiResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.method_client.method_url(method)?;
        let body = with_grant_type(params)?;
        let credentials = self.credentials().await;

        self.method_client
            .post_json(&url, &body, credentials.as_ref())
            .await
    }

    /// Same as [`ElvantoClient::call`], aborted as soon as `cancellation_token` is cancelled.
    pub async fn call_with_cancellation<P>(
        &self,
        method: &str,
        params: &P,
        cancellation_token: &CancellationToken,
    ) -> ApiResult<Value>
    where
        P: Serialize + ?Sized,
    {
        let url = self.method_client.method_url(method)?;
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => {
                tracing::debug!(url, "api call cancelled");
                Err(Error::transport_kind(&url, TransportErrorKind::Cancelled, "request cancelled"))
            }
            response = self.call(method, params) => response,
        }
    }

    pub fn authorize_url(
        &self,
        client_id: &str,
        redirect_uri: &str,
        scope: &str,
        state: Option<&str>,
    ) -> String {
        oauth2::authorize_url_with_base(
            &self.method_client.client().config().oauth_url,
            client_id,
            redirect_uri,
            scope,
            state,
        )
    }

    /// Exchanges the code received on the redirect uri for a token. The client credentials are left untouched.
    pub async fn exchange_token(
        &self,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        code: &str,
    ) -> ApiResult<Token> {
        AuthorizationCode::new(client_id, client_secret, redirect_uri, code)
            .get(self.method_client.client())
            .await
    }

    /// Mints a new token from the current refresh token and replaces the client credentials with it.
    ///
    /// Credentials swapped in by the caller while the refresh is in flight are kept.
    pub async fn refresh_token(&self) -> ApiResult<Token> {
        let refresh_token = self
            .credentials()
            .await
            .as_ref()
            .and_then(|c| c.refresh_token().map(str::to_owned))
            .ok_or_else(|| Error::configuration_error("no refresh token set"))?;

        let token = RefreshToken::new(&refresh_token)
            .get(self.method_client.client())
            .await?;

        let mut credentials = self.credentials.write().await;
        let unchanged = credentials
            .as_ref()
            .and_then(Credentials::refresh_token)
            .map_or(false, |current| current == refresh_token);
        if unchanged {
            let refresh_token = if token.refresh_token().is_empty() {
                refresh_token
            } else {
                token.refresh_token().to_owned()
            };
            *credentials = Some(Credentials::OAuthTokens {
                access_token: token.access_token(),
                refresh_token,
            });
        } else {
            tracing::debug!("credentials changed during refresh, keeping them");
        }
        Ok(token)
    }
}

fn with_grant_type<P>(params: &P) -> ApiResult<serde_json::Map<String, Value>>
where
    P: Serialize + ?Sized,
{
    let mut body = match serde_json::to_value(params) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => serde_json::Map::new(),
        Ok(other) => {
            return Err(Error::configuration_error(format!(
                "params must be a json object but got {other}"
            )))
        }
        Err(err) => {
            return Err(Error::configuration_error(format!(
                "unable to serialize params: {err}"
            )))
        }
    };
    body.insert(
        "grant_type".to_owned(),
        Value::String("client_credentials".to_owned()),
    );
    Ok(body)
}
