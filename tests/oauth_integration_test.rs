mod config;

use elvanto_api::{
    api::Error,
    oauth2::{credentials::Credentials, token::Token},
};
use mockito::Matcher;

#[tokio::test]
async fn test_exchange_token_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("client_id".into(), "1234".into()),
            Matcher::UrlEncoded("client_secret".into(), "secret".into()),
            Matcher::UrlEncoded("redirect_uri".into(), "https://example.com/cb".into()),
            Matcher::UrlEncoded("code".into(), "the code".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"a","expires_in":3600,"refresh_token":"r"}"#)
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), None);
    let actual = client
        .exchange_token("1234", "secret", "https://example.com/cb", "the code")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(Token::new("a", 3600, "r"), actual);
    assert_eq!(None, client.credentials().await);
}

#[tokio::test]
async fn test_exchange_token_rejected_code() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"Invalid code."}"#)
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), None);
    let actual = client
        .exchange_token("1234", "secret", "https://example.com/cb", "expired")
        .await
        .unwrap_err();

    mock.assert_async().await;
    match actual {
        Error::AuthError { response, .. } => {
            let expected: serde_json::Value = serde_json::from_str(
                r#"{"error":"invalid_grant","error_description":"Invalid code."}"#,
            )
            .unwrap();
            assert_eq!(expected, response);
        }
        e => panic!("expected an AuthError but got {:?}", e),
    }
}

#[tokio::test]
async fn test_exchange_token_error_body_with_success_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(r#"{"error":"invalid_client"}"#)
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), None);
    let actual = client
        .exchange_token("1234", "wrong", "https://example.com/cb", "code")
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(actual, Error::AuthError { .. }), "{:?}", actual);
}

#[tokio::test]
async fn test_refresh_token_with_api_key_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), Some(Credentials::api_key("K")));
    let actual = client.refresh_token().await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(actual, Error::ConfigurationError(_)), "{:?}", actual);
    assert_eq!(Some(Credentials::api_key("K")), client.credentials().await);
}

#[tokio::test]
async fn test_refresh_token_with_empty_refresh_token_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), Some(Credentials::oauth("T", "")));
    let actual = client.refresh_token().await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(actual, Error::ConfigurationError(_)), "{:?}", actual);
}

#[tokio::test]
async fn test_refresh_token_replaces_credentials() {
    let mut server = mockito::Server::new_async().await;
    let refresh = server
        .mock("POST", "/oauth/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "R1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"access_token":"T2","expires_in":3600,"refresh_token":"R2"}"#)
        .create_async()
        .await;
    let call = server
        .mock("POST", "/v1/people/getAll.json")
        .match_header("authorization", "Bearer T2")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), Some(Credentials::oauth("T1", "R1")));
    let actual = client.refresh_token().await.unwrap();

    refresh.assert_async().await;
    assert_eq!(Token::new("T2", 3600, "R2"), actual);
    assert_eq!(
        Some(Credentials::oauth("T2", "R2")),
        client.credentials().await
    );

    client.call("people/getAll", &()).await.unwrap();
    call.assert_async().await;
}

#[tokio::test]
async fn test_refresh_token_keeps_refresh_token_when_not_rotated() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_body(r#"{"access_token":"T2","expires_in":3600}"#)
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), Some(Credentials::oauth("T1", "R1")));
    client.refresh_token().await.unwrap();

    mock.assert_async().await;
    assert_eq!(
        Some(Credentials::oauth("T2", "R1")),
        client.credentials().await
    );
}

#[tokio::test]
async fn test_refresh_token_rejected_keeps_credentials() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .with_status(401)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), Some(Credentials::oauth("T1", "R1")));
    let actual = client.refresh_token().await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(actual, Error::AuthError { .. }), "{:?}", actual);
    assert_eq!(
        Some(Credentials::oauth("T1", "R1")),
        client.credentials().await
    );
}

#[tokio::test]
async fn test_refresh_token_keeps_credentials_swapped_during_refresh() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(std::time::Duration::from_millis(300));
            w.write_all(br#"{"access_token":"T2","expires_in":3600,"refresh_token":"R2"}"#)
        })
        .create_async()
        .await;

    let client = config::mock::client(&server.url(), Some(Credentials::oauth("T1", "R1")));
    let (refreshed, _) = tokio::join!(client.refresh_token(), async {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        client
            .set_credentials(Some(Credentials::api_key("OTHER")))
            .await;
    });

    mock.assert_async().await;
    assert_eq!(Token::new("T2", 3600, "R2"), refreshed.unwrap());
    assert_eq!(
        Some(Credentials::api_key("OTHER")),
        client.credentials().await
    );
}
