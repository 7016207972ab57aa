use crate::elvanto::api::{client, ApiResult, Error};
use crate::elvanto::{Client, DeserializedResponse};

use super::credentials::Credentials;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Token triple returned by the token endpoint, kept exactly as received.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    expires_in: u64,
    #[serde(default)]
    refresh_token: String,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token expires in {}s", self.expires_in)
    }
}

pub type AccessToken = String;

impl Token {
    pub fn new(access_token: &str, expires_in: u64, refresh_token: &str) -> Self {
        Self {
            access_token: access_token.to_owned(),
            expires_in,
            refresh_token: refresh_token.to_owned(),
        }
    }

    pub fn access_token(&self) -> AccessToken {
        self.access_token.to_owned()
    }

    /// Number of seconds the access token is valid for, counted from its issuance.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    pub fn refresh_token(&self) -> &str {
        self.refresh_token.as_str()
    }

    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        let expires_in = i64::try_from(self.expires_in).unwrap_or(i64::MAX);
        chrono::Duration::try_seconds(expires_in)
            .and_then(|d| issued_at.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn into_credentials(self) -> Credentials {
        Credentials::OAuthTokens {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
    }
}

#[async_trait::async_trait]
pub trait TokenGenerator: Send + Sync {
    async fn get(&self, client: &Client) -> ApiResult<Token>;
}

/// `authorization_code` grant: trades the code received on the redirect uri for a token.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct AuthorizationCode {
    grant_type: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    code: String,
}

impl AuthorizationCode {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str, code: &str) -> Self {
        Self {
            grant_type: "authorization_code".to_owned(),
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            redirect_uri: redirect_uri.to_owned(),
            code: code.to_owned(),
        }
    }
}

/// `refresh_token` grant: mints a new token from a refresh token.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct RefreshToken {
    grant_type: String,
    refresh_token: String,
}

impl RefreshToken {
    pub fn new(refresh_token: &str) -> Self {
        Self {
            grant_type: "refresh_token".to_owned(),
            refresh_token: refresh_token.to_owned(),
        }
    }
}

#[async_trait::async_trait]
impl TokenGenerator for AuthorizationCode {
    #[tracing::instrument(skip_all, fields(client_id = %self.client_id))]
    async fn get(&self, client: &Client) -> ApiResult<Token> {
        request_token(client, self).await
    }
}

#[async_trait::async_trait]
impl TokenGenerator for RefreshToken {
    #[tracing::instrument(skip_all)]
    async fn get(&self, client: &Client) -> ApiResult<Token> {
        request_token(client, self).await
    }
}

async fn request_token<F>(client: &Client, form: &F) -> ApiResult<Token>
where
    F: Serialize + ?Sized,
{
    let url = client.config.oauth_token_url.as_str();
    tracing::debug!(url, "requesting oauth token");

    let response = client
        .client
        .post(url)
        .form(form)
        .send()
        .await
        .map_err(|err| Error::transport(url, err))?;

    if response.status() == reqwest::StatusCode::BAD_REQUEST {
        return Err(client::auth_error(url, response).await);
    }

    let token: DeserializedResponse<Token> =
        client::read_json(url, client::success_response(url, response).await?).await?;
    token
        .into_result()
        .map_err(|json| Error::auth_error(url, json))
}
