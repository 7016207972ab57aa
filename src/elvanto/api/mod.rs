pub(crate) mod client;
mod elvanto_client;

pub use elvanto_client::ElvantoClient;

type Cause = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Cancelled,
    Status(u16),
    Decode,
    EmptyBody,
    Request,
}

#[derive(Debug)]
pub enum Error {
    /// The request did not produce a usable response.
    TransportError {
        url: String,
        kind: TransportErrorKind,
        cause: Cause,
    },
    /// The remote rejected the credentials, the code or the refresh token.
    AuthError {
        url: String,
        response: serde_json::Value,
    },
    /// Credential material required by the operation is absent, or the call itself is malformed.
    ConfigurationError(String),
    CredentialsError(super::oauth2::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TransportError { url, kind, cause } => {
                write!(f, "api call to {url} failed ({kind:?}): {cause}")
            }
            Error::AuthError { url, response } => {
                write!(f, "api call to {url} rejected: {response}")
            }
            Error::ConfigurationError(message) => write!(f, "configuration error: {message}"),
            Error::CredentialsError(e) => write!(f, "credentials error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::TransportError { cause, .. } => Some(cause.as_ref()),
            Error::CredentialsError(e) => Some(e),
            Error::AuthError { .. } | Error::ConfigurationError(_) => None,
        }
    }
}

impl Error {
    /// Classifies a reqwest failure by what went wrong on the wire.
    pub(crate) fn transport(url: &str, error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if error.is_decode() {
            TransportErrorKind::Decode
        } else if let Some(status) = error.status() {
            TransportErrorKind::Status(status.as_u16())
        } else {
            TransportErrorKind::Request
        };
        Self::transport_kind(url, kind, error)
    }

    pub(crate) fn transport_kind<E>(url: &str, kind: TransportErrorKind, cause: E) -> Self
    where
        E: Into<Cause>,
    {
        Self::TransportError {
            url: url.to_owned(),
            kind,
            cause: cause.into(),
        }
    }

    pub(crate) fn auth_error(url: &str, response: serde_json::Value) -> Self {
        Self::AuthError {
            url: url.to_owned(),
            response,
        }
    }

    pub(crate) fn configuration_error<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self::ConfigurationError(message.into())
    }

    /// Transport failure kind, if any.
    pub fn transport_error_kind(&self) -> Option<TransportErrorKind> {
        match self {
            Error::TransportError { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<super::oauth2::Error> for Error {
    fn from(e: super::oauth2::Error) -> Self {
        Error::CredentialsError(e)
    }
}

pub type ApiResult<T> = std::result::Result<T, Error>;
