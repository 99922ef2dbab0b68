//! Integration tests for the push channel: fan-out, ordering, and lifecycle.

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;

/// Helper: start the server on a random port and return (base_url, addr).
async fn start_test_server(session_timeout_secs: u64) -> (String, SocketAddr) {
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = tmp_dir.path().to_str().unwrap().to_string();

    let db = wishwall_server::db::init_db(&data_dir).expect("Failed to init DB");
    wishwall_server::polls::seed_poll_counters(&db).expect("Failed to seed poll counters");
    wishwall_server::quotes::seed::seed_default_quotes(&db).expect("Failed to seed quotes");

    let state = wishwall_server::state::AppState {
        db,
        wishes: Arc::new(wishwall_server::wishes::store::WishStore::new(50)),
        connections: wishwall_server::ws::new_connection_registry(),
        session_timeout_secs,
        max_message_chars: 200,
        max_wishes: 50,
        cors_origins: "*".to_string(),
    };

    let app = wishwall_server::routes::build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
        let _keep = tmp_dir;
    });

    (format!("http://{}", addr), addr)
}

async fn submit_wish(base_url: &str, message: &str) {
    let resp = reqwest::Client::new()
        .post(format!("{}/wish", base_url))
        .json(&json!({ "message": message }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
}

/// Read the next text frame within a timeout and parse it as JSON.
async fn next_wish_frame<S>(read: &mut S) -> serde_json::Value
where
    S: futures_util::Stream<
            Item = Result<Message, tokio_tungstenite::tungstenite::Error>,
        > + Unpin,
{
    let msg = tokio::time::timeout(Duration::from_secs(2), read.next())
        .await
        .expect("Expected a pushed frame within timeout")
        .expect("Stream should not end")
        .expect("WebSocket error");

    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("Expected text frame, got: {:?}", other),
    }
}

#[tokio::test]
async fn connected_client_receives_submitted_wish() {
    let (base_url, addr) = start_test_server(300).await;

    let (ws_stream, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect to WebSocket");
    let (_write, mut read) = ws_stream.split();

    submit_wish(&base_url, "midnight is coming").await;

    let wish = next_wish_frame(&mut read).await;
    assert_eq!(wish["message"], "midnight is coming");
    assert_eq!(wish["author"], "Anonymous");
}

#[tokio::test]
async fn wishes_arrive_in_submission_order() {
    let (base_url, addr) = start_test_server(300).await;

    let (ws_stream, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect");
    let (_write, mut read) = ws_stream.split();

    submit_wish(&base_url, "first").await;
    submit_wish(&base_url, "second").await;

    let w1 = next_wish_frame(&mut read).await;
    let w2 = next_wish_frame(&mut read).await;
    assert_eq!(w1["message"], "first");
    assert_eq!(w2["message"], "second");
}

#[tokio::test]
async fn every_connected_client_receives_the_broadcast() {
    let (base_url, addr) = start_test_server(300).await;

    let (stream_a, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect client A");
    let (stream_b, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect client B");
    let (_wa, mut read_a) = stream_a.split();
    let (_wb, mut read_b) = stream_b.split();

    submit_wish(&base_url, "to everyone").await;

    assert_eq!(next_wish_frame(&mut read_a).await["message"], "to everyone");
    assert_eq!(next_wish_frame(&mut read_b).await["message"], "to everyone");
}

#[tokio::test]
async fn session_timeout_closes_with_going_away() {
    let (_base_url, addr) = start_test_server(1).await;

    let (ws_stream, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect");
    let (_write, mut read) = ws_stream.split();

    // No client activity: the server must close on its own at the deadline
    let msg = tokio::time::timeout(Duration::from_secs(3), read.next())
        .await
        .expect("Expected close frame before timeout")
        .expect("Stream should yield a close frame")
        .expect("WebSocket error");

    match msg {
        Message::Close(Some(frame)) => {
            assert_eq!(frame.code, CloseCode::Away);
            assert!(
                frame.reason.as_str().contains("Session timed out"),
                "Unexpected close reason: {}",
                frame.reason.as_str()
            );
        }
        other => panic!("Expected close frame, got: {:?}", other),
    }
}

#[tokio::test]
async fn client_text_is_drained_and_connection_stays_open() {
    let (base_url, addr) = start_test_server(300).await;

    let (ws_stream, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to connect");
    let (mut write, mut read) = ws_stream.split();

    // Client chatter is discarded, not echoed and not fatal
    write
        .send(Message::Text("hello server".into()))
        .await
        .unwrap();

    submit_wish(&base_url, "still alive").await;
    assert_eq!(next_wish_frame(&mut read).await["message"], "still alive");
}

#[tokio::test]
async fn disconnected_client_is_pruned_and_others_still_receive() {
    let (base_url, addr) = start_test_server(300).await;

    // Connect and immediately close the first client
    {
        let (ws_stream, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
            .await
            .expect("Failed to connect");
        let (mut write, _read) = ws_stream.split();
        write
            .send(Message::Close(None))
            .await
            .expect("Failed to send close");
    }

    // Give the server a moment to clean up
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (ws_stream, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("Failed to reconnect after cleanup");
    let (_write, mut read) = ws_stream.split();

    submit_wish(&base_url, "after cleanup").await;
    assert_eq!(next_wish_frame(&mut read).await["message"], "after cleanup");
}
