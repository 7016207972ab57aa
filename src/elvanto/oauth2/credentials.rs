use std::path::Path;

use serde::Deserialize;

use super::{Error, TokenResult};

pub const API_KEY_ENV: &str = "ELVANTO_API_KEY";
pub const ACCESS_TOKEN_ENV: &str = "ELVANTO_ACCESS_TOKEN";
pub const REFRESH_TOKEN_ENV: &str = "ELVANTO_REFRESH_TOKEN";
pub const CREDENTIALS_FILE_ENV: &str = "ELVANTO_APPLICATION_CREDENTIALS";

/// Authentication material of a client: either an api key or an oauth token pair, never both.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    OAuthTokens {
        access_token: String,
        refresh_token: String,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.debug_tuple("ApiKey").field(&"***").finish(),
            Credentials::OAuthTokens { refresh_token, .. } => f
                .debug_struct("OAuthTokens")
                .field("access_token", &"***")
                .field(
                    "refresh_token",
                    &if refresh_token.is_empty() { "" } else { "***" },
                )
                .finish(),
        }
    }
}

/// On disk/env shape, same keys as the ones used by the other Elvanto api wrappers.
#[derive(Deserialize, Debug, Default)]
struct RawCredentials {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TryFrom<RawCredentials> for Credentials {
    type Error = Error;

    fn try_from(raw: RawCredentials) -> Result<Self, Self::Error> {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        match (non_empty(raw.api_key), non_empty(raw.access_token)) {
            (Some(_), Some(_)) => Err(Error::ConflictingCredentials),
            (Some(api_key), None) => Ok(Credentials::ApiKey(api_key)),
            (None, Some(access_token)) => Ok(Credentials::OAuthTokens {
                access_token,
                refresh_token: raw.refresh_token.unwrap_or_default(),
            }),
            (None, None) => Err(Error::MissingCredentials),
        }
    }
}

impl Credentials {
    pub fn api_key(api_key: &str) -> Self {
        Credentials::ApiKey(api_key.to_owned())
    }

    pub fn oauth(access_token: &str, refresh_token: &str) -> Self {
        Credentials::OAuthTokens {
            access_token: access_token.to_owned(),
            refresh_token: refresh_token.to_owned(),
        }
    }

    /// The refresh token, when the credentials carry a non empty one.
    pub fn refresh_token(&self) -> Option<&str> {
        match self {
            Credentials::OAuthTokens { refresh_token, .. } if !refresh_token.is_empty() => {
                Some(refresh_token.as_str())
            }
            _ => None,
        }
    }

    /// Parses `{"api_key": "..."}` or `{"access_token": "...", "refresh_token": "..."}`.
    pub fn from(s: &str) -> TokenResult<Self> {
        let raw: RawCredentials =
            serde_json::from_str(s).map_err(Error::deserialization_error::<Credentials>)?;
        raw.try_into()
    }

    pub async fn from_file<T>(file_path: T) -> TokenResult<Self>
    where
        T: AsRef<Path>,
    {
        let content = tokio::fs::read_to_string(file_path.as_ref())
            .await
            .map_err(|err| Error::io_error("error while reading file", file_path.as_ref(), err))?;
        Self::from(content.as_str())
    }

    /// Reads `ELVANTO_API_KEY`, or `ELVANTO_ACCESS_TOKEN` with an optional `ELVANTO_REFRESH_TOKEN`.
    pub fn from_env() -> TokenResult<Self> {
        from_lookup(|key| std::env::var(key))
    }

    /// Reads the credentials file named by `ELVANTO_APPLICATION_CREDENTIALS`.
    pub async fn default() -> TokenResult<Self> {
        let default_path = {
            let key = CREDENTIALS_FILE_ENV;
            std::env::var(key).map_err(|err| Error::env_var_error(key, err))?
        };
        Self::from_file(default_path).await
    }
}

fn from_lookup<F>(lookup: F) -> TokenResult<Credentials>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let var = |key: &str| match lookup(key) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::env_var_error(key, err)),
    };

    RawCredentials {
        api_key: var(API_KEY_ENV)?,
        access_token: var(ACCESS_TOKEN_ENV)?,
        refresh_token: var(REFRESH_TOKEN_ENV)?,
    }
    .try_into()
}
