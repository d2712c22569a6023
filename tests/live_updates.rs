//! The live channel applies a delivery and fans out notifications to subscribers.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dynconf::{Client, ClientOptions, GetOptions};
use serde_json::json;
use support::ScriptedFetchClient;

#[tokio::test]
async fn delivery_updates_the_store_and_notifies_subscribers() {
    let fetch = Arc::new(ScriptedFetchClient::new());
    fetch.push_get_ok(r#"{"configs":[{"name":"greeting","value":"hello","overrides":[]}]}"#);
    fetch.set_stream_chunks(vec![
        r#"{"configs":[{"name":"greeting","value":"howdy","overrides":[]}]}"#,
    ]);

    let options = ClientOptions::new("https://example.invalid", "sdk-key")
        .with_fetch_client(fetch.clone() as _)
        .with_retry_delay(Duration::from_millis(20));
    let client = Client::build(options).await.expect("builds");

    assert_eq!(
        client.get("greeting", GetOptions::default()).unwrap(),
        json!("hello")
    );

    let per_name_hits = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&per_name_hits);
    let _unsub = client.subscribe(
        "greeting",
        Arc::new(move |name| {
            assert_eq!(name, "greeting");
            hits.fetch_add(1, Ordering::SeqCst);
        }),
    );

    let global_hits = Arc::new(AtomicUsize::new(0));
    let ghits = Arc::clone(&global_hits);
    let _unsub_all = client.subscribe_all(Arc::new(move || {
        ghits.fetch_add(1, Ordering::SeqCst);
    }));

    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        client.get("greeting", GetOptions::default()).unwrap(),
        json!("howdy")
    );
    assert_eq!(per_name_hits.load(Ordering::SeqCst), 1);
    assert_eq!(global_hits.load(Ordering::SeqCst), 1);

    client.close().await;
}

#[tokio::test]
async fn unsubscribed_listener_never_fires_again() {
    let fetch = Arc::new(ScriptedFetchClient::new());
    fetch.push_get_ok(r#"{"configs":[{"name":"x","value":1,"overrides":[]}]}"#);
    fetch.set_stream_chunks(vec![r#"{"configs":[{"name":"x","value":2,"overrides":[]}]}"#]);

    let options = ClientOptions::new("https://example.invalid", "sdk-key")
        .with_fetch_client(fetch.clone() as _)
        .with_retry_delay(Duration::from_millis(20));
    let client = Client::build(options).await.expect("builds");

    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    let unsub = client.subscribe("x", Arc::new(move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    }));
    unsub.call();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    client.close().await;
}
