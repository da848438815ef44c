//! End-to-end test against a local WebSocket bridge stand-in

use futures_util::{SinkExt, StreamExt};
use openvr2ws_client::client::ClientActor;
use openvr2ws_client::config::AppConfig;
use openvr2ws_client::connection::{ConnectionState, WebSocketTransport};
use openvr2ws_client::protocol::DeviceClass;
use openvr2ws_client::sink::MemorySink;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

/// Accept one client, greet it with device ids and forward whatever it sends
async fn spawn_bridge() -> (u16, mpsc::UnboundedReceiver<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        let greeting = json!({
            "Type": "Result",
            "Key": "DeviceIds",
            "Data": {"DeviceToIndex": {"HMD": [0], "Controller": [3]}, "SourceToIndex": {"/user/head": 0}}
        });
        ws.send(Message::Text(greeting.to_string())).await.unwrap();

        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                let _ = tx.send(serde_json::from_str(&text).unwrap());
            }
        }
    });

    (port, rx)
}

#[tokio::test]
async fn test_connects_and_requests_properties() {
    let (port, mut received) = spawn_bridge().await;

    let mut config = AppConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = port;
    config.timing.startup_delay_ms = 0;

    let sink = MemorySink::new();
    let (client, task) = ClientActor::spawn(
        config,
        WebSocketTransport::new(),
        sink.clone(),
    )
    .unwrap();

    let snapshot = timeout(Duration::from_secs(5), async {
        loop {
            let snapshot = client.snapshot().await.unwrap();
            if snapshot.connection == ConnectionState::Connected
                && !snapshot.tables.indices_for_class(DeviceClass::Hmd).is_empty()
            {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("client never received device ids");

    assert_eq!(snapshot.tables.indices_for_class(DeviceClass::Controller), &[3]);
    assert_eq!(snapshot.tables.index_for_source("/user/head"), Some(0));
    assert_eq!(sink.notices(), vec!["CONNECTED"]);

    client.request_properties();
    let mut requests = Vec::new();
    for _ in 0..2 {
        let request = timeout(Duration::from_secs(5), received.recv())
            .await
            .expect("bridge received nothing")
            .unwrap();
        requests.push(request);
    }
    assert_eq!(
        requests,
        vec![
            json!({"key": "DeviceProperty", "value": "Prop_SerialNumber_String", "device": 0}),
            json!({"key": "DeviceProperty", "value": "Prop_SerialNumber_String", "device": 3}),
        ]
    );

    client.shutdown();
    timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unreachable_bridge_stays_disconnected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut config = AppConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = port;
    config.timing.startup_delay_ms = 0;

    let sink = MemorySink::new();
    let (client, _task) = ClientActor::spawn(
        config,
        WebSocketTransport::new(),
        sink.clone(),
    )
    .unwrap();

    timeout(Duration::from_secs(5), async {
        while sink.notices().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection failure was never reported");

    client.request_device_ids();
    let snapshot = client.snapshot().await.unwrap();
    assert_eq!(snapshot.connection, ConnectionState::Disconnected);
    assert!(sink.notices().iter().any(|n| n.contains("ERROR:")));
}
