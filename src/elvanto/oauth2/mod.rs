pub mod credentials;
pub mod token;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

pub const DEFAULT_SCOPE: &str = "AdministerAccount";

#[derive(Debug)]
pub enum Error {
    DeserializationError {
        expected_type: String,
        error: serde_json::Error,
    },
    EnvVarError {
        key: String,
        error: std::env::VarError,
    },
    IoError {
        message: String,
        error: std::io::Error,
    },
    MissingCredentials,
    ConflictingCredentials,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DeserializationError {
                expected_type,
                error,
            } => write!(f, "unable to deserialize {expected_type}: {error}"),
            Error::EnvVarError { key, error } => write!(f, "env var {key}: {error}"),
            Error::IoError { message, error } => write!(f, "{message}: {error}"),
            Error::MissingCredentials => write!(f, "neither an api key nor an access token is set"),
            Error::ConflictingCredentials => {
                write!(f, "both an api key and an access token are set, only one is allowed")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializationError { error, .. } => Some(error),
            Error::EnvVarError { error, .. } => Some(error),
            Error::IoError { error, .. } => Some(error),
            Error::MissingCredentials | Error::ConflictingCredentials => None,
        }
    }
}

impl Error {
    pub fn io_error<T>(message: &str, path: T, error: std::io::Error) -> Error
    where
        T: AsRef<std::path::Path>,
    {
        Error::IoError {
            message: format!("{} {}", message, path.as_ref().display()),
            error,
        }
    }

    pub fn env_var_error(key: &str, error: std::env::VarError) -> Error {
        Error::EnvVarError {
            key: key.to_owned(),
            error,
        }
    }

    pub fn deserialization_error<T>(error: serde_json::Error) -> Error {
        let expected_type = std::any::type_name::<T>().to_owned();
        Error::DeserializationError {
            expected_type,
            error,
        }
    }
}

type TokenResult<T> = std::result::Result<T, Error>;

fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, NON_ALPHANUMERIC).to_string()
}

/// Builds the url users of your application should be redirected to in order to grant it access.
///
/// No request is sent. `state` is only part of the url when it is set and not empty.
pub fn authorize_url(
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: Option<&str>,
) -> String {
    authorize_url_with_base(crate::elvanto::OAUTH_URL, client_id, redirect_uri, scope, state)
}

pub(crate) fn authorize_url_with_base(
    oauth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: Option<&str>,
) -> String {
    let mut url = format!(
        "{}?type=web_server&client_id={}&redirect_uri={}&scope={}",
        oauth_url,
        percent_encode(client_id),
        percent_encode(redirect_uri),
        percent_encode(scope)
    );
    if let Some(state) = state.filter(|s| !s.is_empty()) {
        url.push_str("&state=");
        url.push_str(&percent_encode(state));
    }
    url
}
