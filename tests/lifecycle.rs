//! Initialization failure modes and `close` semantics.

mod support;

use std::sync::Arc;
use std::time::Duration;

use dynconf::{Client, ClientOptions, Error, GetOptions, Required};
use support::ScriptedFetchClient;

#[tokio::test]
async fn missing_required_config_fails_initialization() {
    let fetch = Arc::new(ScriptedFetchClient::new());
    fetch.push_get_ok(r#"{"configs":[{"name":"present","value":1,"overrides":[]}]}"#);

    let options = ClientOptions::new("https://example.invalid", "sdk-key")
        .with_fetch_client(fetch as _)
        .with_required(Required::Names(vec!["required-flag".to_string()]))
        .without_live_channel();

    let err = Client::build(options).await.unwrap_err();
    match err {
        Error::MissingRequired { names } => assert_eq!(names, vec!["required-flag".to_string()]),
        other => panic!("expected MissingRequired, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_sdk_key_is_reported_distinctly() {
    let fetch = Arc::new(ScriptedFetchClient::new());
    fetch.push_get_status(401);

    let options = ClientOptions::new("https://example.invalid", "sdk-key")
        .with_fetch_client(fetch as _)
        .without_live_channel();

    let err = Client::build(options).await.unwrap_err();
    match err {
        Error::InvalidSdkKey { status } => assert_eq!(status, 401),
        other => panic!("expected InvalidSdkKey, got {other:?}"),
    }
}

#[tokio::test]
async fn a_hung_initial_load_times_out() {
    let fetch = Arc::new(ScriptedFetchClient::new());
    fetch.push_get_hangs();

    let options = ClientOptions::new("https://example.invalid", "sdk-key")
        .with_fetch_client(fetch as _)
        .with_initialization_timeout(Duration::from_millis(30))
        .without_live_channel();

    let err = Client::build(options).await.unwrap_err();
    assert!(matches!(err, Error::InitializationTimeout));
}

#[tokio::test]
async fn close_is_idempotent_and_store_stays_readable() {
    let fetch = Arc::new(ScriptedFetchClient::new());
    fetch.push_get_ok(r#"{"configs":[{"name":"x","value":"stable","overrides":[]}]}"#);

    let options = ClientOptions::new("https://example.invalid", "sdk-key")
        .with_fetch_client(fetch as _)
        .without_live_channel();
    let client = Client::build(options).await.expect("builds");

    client.close().await;
    client.close().await;

    assert_eq!(client.state(), dynconf::ClientState::Closed);
    assert_eq!(
        client.get("x", GetOptions::default()).unwrap(),
        serde_json::json!("stable")
    );

    // Subscribing after close is accepted but inert.
    let unsub = client.subscribe("x", Arc::new(|_| panic!("closed client must not notify")));
    unsub.call();
}

#[tokio::test]
async fn get_falls_back_to_caller_default_when_absent() {
    let fetch = Arc::new(ScriptedFetchClient::new());
    fetch.push_get_ok(r#"{"configs":[]}"#);

    let options = ClientOptions::new("https://example.invalid", "sdk-key")
        .with_fetch_client(fetch as _)
        .without_live_channel();
    let client = Client::build(options).await.expect("builds");

    assert_eq!(
        client
            .get("absent", GetOptions::default().with_default(serde_json::json!("fallback")))
            .unwrap(),
        serde_json::json!("fallback")
    );

    let err = client.get("absent", GetOptions::default()).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
