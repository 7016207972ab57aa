use std::{net::SocketAddr, time::Duration};

use elvanto_api::{api::ElvantoClient, oauth2::credentials::Credentials, Client, ClientConfig};
use tokio::net::TcpListener;

#[allow(dead_code)] //each test crate only uses part of the helpers
pub fn client(base_url: &str, credentials: Option<Credentials>) -> ElvantoClient {
    let client = Client::new(ClientConfig::with_base_url(base_url)).unwrap();
    ElvantoClient::with_client(client, credentials)
}

#[allow(dead_code)]
pub fn client_with_timeout(
    base_url: &str,
    credentials: Option<Credentials>,
    timeout: Duration,
) -> ElvantoClient {
    let config = ClientConfig::with_base_url(base_url).with_timeout(timeout);
    ElvantoClient::with_client(Client::new(config).unwrap(), credentials)
}

/// Accepts connections and never answers.
#[allow(dead_code)]
pub async fn silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut connections = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            connections.push(stream);
        }
    });
    addr
}
