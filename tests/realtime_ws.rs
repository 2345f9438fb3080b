//! End-to-end tests: real server, real WebSocket clients.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use taskhub_gateway::api::dto::RealtimeStatusResponse;
use taskhub_gateway::app_state::AppState;
use taskhub_gateway::config::GatewayConfig;
use taskhub_gateway::domain::ConnectionRegistry;
use taskhub_gateway::server::build_router;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> SocketAddr {
    let registry = Arc::new(ConnectionRegistry::with_write_timeout(Duration::from_secs(2)));
    let app = build_router(AppState::new(registry), &GatewayConfig::default());

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn connect(addr: SocketAddr, user_id: &str) -> Client {
    let url = format!("ws://{addr}/ws?user_id={user_id}");
    let Ok((stream, _)) = connect_async(url).await else {
        panic!("ws connect for {user_id}");
    };
    stream
}

async fn status(addr: SocketAddr) -> RealtimeStatusResponse {
    let Ok(response) = reqwest::get(format!("http://{addr}/api/v1/realtime/status")).await else {
        panic!("status request");
    };
    let Ok(body) = response.json::<RealtimeStatusResponse>().await else {
        panic!("status body");
    };
    body
}

/// Registration happens after the upgrade completes, so poll until the
/// registry reaches the expected size.
async fn wait_for_connections(addr: SocketAddr, expected: usize) -> RealtimeStatusResponse {
    for _ in 0..100 {
        let current = status(addr).await;
        if current.connection_count == expected {
            return current;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("registry never reached {expected} connections");
}

async fn next_json(client: &mut Client) -> Value {
    loop {
        let Ok(frame) = tokio::time::timeout(Duration::from_secs(5), client.next()).await else {
            panic!("timed out waiting for a frame");
        };
        let Some(Ok(message)) = frame else {
            panic!("stream ended");
        };
        if let Message::Text(text) = message {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("frame should be JSON: {text}");
            };
            return value;
        }
    }
}

async fn send_json(client: &mut Client, value: &Value) {
    if client.send(Message::text(value.to_string())).await.is_err() {
        panic!("ws send");
    }
}

async fn assert_silent(client: &mut Client) {
    let result = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "expected no frame, got {result:?}");
}

#[tokio::test]
async fn missing_user_id_is_rejected() {
    let addr = spawn_server().await;
    assert!(connect_async(format!("ws://{addr}/ws")).await.is_err());
    assert!(connect_async(format!("ws://{addr}/ws?user_id=")).await.is_err());
    assert_eq!(status(addr).await.connection_count, 0);
}

#[tokio::test]
async fn direct_message_reaches_only_recipient() {
    let addr = spawn_server().await;
    let mut alice = connect(addr, "alice").await;
    let mut bob = connect(addr, "bob").await;
    wait_for_connections(addr, 2).await;

    let msg = json!({"type": "direct", "to": "bob", "body": "hi bob"});
    send_json(&mut alice, &msg).await;

    assert_eq!(next_json(&mut bob).await, msg);
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn client_broadcast_reaches_every_connection() {
    let addr = spawn_server().await;
    let mut alice = connect(addr, "alice").await;
    let mut bob_phone = connect(addr, "bob").await;
    let mut bob_laptop = connect(addr, "bob").await;
    let snapshot = wait_for_connections(addr, 3).await;
    assert_eq!(snapshot.online_user_count, 2);

    let msg = json!({"type": "broadcast", "body": "hello all"});
    send_json(&mut alice, &msg).await;

    assert_eq!(next_json(&mut alice).await, msg);
    assert_eq!(next_json(&mut bob_phone).await, msg);
    assert_eq!(next_json(&mut bob_laptop).await, msg);
}

#[tokio::test]
async fn unknown_and_malformed_frames_keep_connection_open() {
    let addr = spawn_server().await;
    let mut alice = connect(addr, "alice").await;
    wait_for_connections(addr, 1).await;

    if alice.send(Message::text("not json")).await.is_err() {
        panic!("ws send");
    }
    send_json(&mut alice, &json!({"type": "typing"})).await;

    let ping = json!({"type": "broadcast", "n": 1});
    send_json(&mut alice, &ping).await;
    assert_eq!(next_json(&mut alice).await, ping);
    assert_eq!(status(addr).await.connection_count, 1);
}

#[tokio::test]
async fn closing_last_connection_takes_user_offline() {
    let addr = spawn_server().await;
    let mut first = connect(addr, "carol").await;
    let second = connect(addr, "carol").await;
    wait_for_connections(addr, 2).await;

    let _ = first.close(None).await;
    let snapshot = wait_for_connections(addr, 1).await;
    assert_eq!(snapshot.online_users, vec!["carol".to_string()]);

    drop(second);
    let snapshot = wait_for_connections(addr, 0).await;
    assert!(snapshot.online_users.is_empty());
}

#[tokio::test]
async fn product_notification_is_pushed_to_clients() {
    let addr = spawn_server().await;
    let mut alice = connect(addr, "alice").await;
    wait_for_connections(addr, 1).await;

    let client = reqwest::Client::new();
    let Ok(response) = client
        .post(format!("http://{addr}/api/v1/notifications/products"))
        .json(&json!({"product_id": 12, "product_name": "Chair"}))
        .send()
        .await
    else {
        panic!("notification request");
    };
    assert!(response.status().is_success());

    let event = next_json(&mut alice).await;
    assert_eq!(event.get("type"), Some(&json!("new_product")));
    assert_eq!(event.get("product_id"), Some(&json!(12)));
    assert_eq!(event.get("message"), Some(&json!("New product: Chair")));
}
