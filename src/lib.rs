//! Async client for the [Elvanto](https://www.elvanto.com/api/) API v1
//!
//! - api key authentication: HTTP basic auth, nothing else to configure
//! - oauth2 authentication: authorization url, code exchange and token refresh
//! - every method of the api is reachable through [`api::ElvantoClient::call`], the json response is returned as is
//! - errors are explicit: transport failures, rejected credentials and missing credentials never look like an empty response
//!
//! Requests time out after 10 seconds (connect and total).
//!
//! # Quick Start
//! ```rust,no_run
//! use elvanto_api::{
//!     api::{ApiResult, ElvantoClient},
//!     oauth2::credentials::Credentials,
//! };
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> ApiResult<()> {
//!     let client = ElvantoClient::new(Credentials::api_key("your api key"))?;
//!
//!     let people = client
//!         .call("people/getAll", &json!({ "page": 1, "page_size": 10 }))
//!         .await?;
//!
//!     println!("{}", people);
//!     Ok(())
//! }
//! ```
//!
//! # OAuth
//! ```rust,no_run
//! use elvanto_api::{api::{ApiResult, ElvantoClient}, oauth2};
//!
//! #[tokio::main]
//! async fn main() -> ApiResult<()> {
//!     let url = oauth2::authorize_url("1234", "https://example.com/callback", oauth2::DEFAULT_SCOPE, None);
//!     println!("redirect your user to {}", url);
//!
//!     let client = ElvantoClient::no_auth()?;
//!     let token = client
//!         .exchange_token("1234", "client secret", "https://example.com/callback", "code from callback")
//!         .await?;
//!     client.set_credentials(Some(token.into_credentials())).await;
//!
//!     let token = client.refresh_token().await?;
//!     println!("{}", token);
//!     Ok(())
//! }
//! ```
mod elvanto;

pub use elvanto::api;
pub use elvanto::oauth2;
pub use elvanto::{Client, ClientConfig};
