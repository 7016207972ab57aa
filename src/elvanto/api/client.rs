use super::{ApiResult, Error, TransportErrorKind};
use crate::elvanto::{oauth2::credentials::Credentials, Client};
use reqwest::{header::CONTENT_TYPE, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const API_KEY_PASSWORD: &str = "nopass";

#[derive(Debug, Clone)]
pub(super) struct MethodClient {
    client: Client,
}

impl MethodClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// `{api_endpoint}/{method}.json`, rejecting anything that is not a method path like `people/getAll`.
    pub fn method_url(&self, method: &str) -> ApiResult<String> {
        let is_valid_segment = |segment: &str| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        };
        if !method.split('/').all(is_valid_segment) {
            return Err(Error::configuration_error(format!(
                "invalid api method name {method:?}"
            )));
        }
        Ok(format!("{}/{}.json", self.client.config.api_endpoint, method))
    }

    pub async fn post_json<B, R>(
        &self,
        url: &str,
        body: &B,
        credentials: Option<&Credentials>,
    ) -> ApiResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(|err| {
            Error::configuration_error(format!("unable to serialize params: {err}"))
        })?;

        tracing::debug!(url, "posting api method call");
        let request = with_auth(self.client.client.post(url), credentials)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body);
        let response = request.send().await.map_err(|err| Error::transport(url, err))?;
        read_json(url, success_response(url, response).await?).await
    }
}

pub(crate) fn with_auth(
    request_builder: RequestBuilder,
    credentials: Option<&Credentials>,
) -> RequestBuilder {
    match credentials {
        None => request_builder,
        Some(Credentials::OAuthTokens { access_token, .. }) => {
            request_builder.bearer_auth(access_token)
        }
        Some(Credentials::ApiKey(api_key)) => {
            request_builder.basic_auth(api_key, Some(API_KEY_PASSWORD))
        }
    }
}

pub(crate) async fn success_response(
    url: &str,
    response: reqwest::Response,
) -> ApiResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(auth_error(url, response).await);
    }

    let body = response
        .text()
        .await
        .map_err(|err| Error::transport(url, err))?;
    tracing::warn!(url, %status, "unexpected api response");
    Err(Error::transport_kind(
        url,
        TransportErrorKind::Status(status.as_u16()),
        format!("unexpected status {status}: {body}"),
    ))
}

/// Turns a rejection into an [`Error::AuthError`], keeping the remote json when there is one.
pub(crate) async fn auth_error(url: &str, response: reqwest::Response) -> Error {
    let status = response.status();
    tracing::warn!(url, %status, "request rejected");
    match response.text().await {
        Ok(body) => {
            let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
            Error::auth_error(url, json)
        }
        Err(err) => Error::transport(url, err),
    }
}

pub(crate) async fn read_json<R>(url: &str, response: reqwest::Response) -> ApiResult<R>
where
    R: DeserializeOwned,
{
    let bytes = response
        .bytes()
        .await
        .map_err(|err| Error::transport(url, err))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::transport_kind(
            url,
            TransportErrorKind::EmptyBody,
            "empty response body",
        ));
    }

    serde_json::from_slice(&bytes)
        .map_err(|err| Error::transport_kind(url, TransportErrorKind::Decode, err))
}
