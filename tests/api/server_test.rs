/*!
 * WebSocket Server Tests
 * End-to-end exchanges over a real socket
 */

use futures::{SinkExt, StreamExt};
use gc_manager::{
    AlgorithmRegistry, BlockLedger, BlockStatus, GcManager, GcServer, GcSettings, MemoryBlock,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn test_manager() -> Arc<GcManager> {
    let ledger = BlockLedger::from_blocks(
        vec![
            MemoryBlock::new(1, 4096, BlockStatus::Active),
            MemoryBlock::new(2, 2048, BlockStatus::Fragmented),
            MemoryBlock::new(3, 2048, BlockStatus::Free),
        ],
        6144,
    )
    .unwrap();
    Arc::new(
        GcManager::builder()
            .with_ledger(ledger)
            .with_registry(AlgorithmRegistry::with_defaults())
            .with_seed(5)
            .with_settings(GcSettings::default().with_background_collection(false))
            .build()
            .unwrap(),
    )
}

async fn start_server(
    manager: Arc<GcManager>,
    push_interval: Duration,
) -> (SocketAddr, oneshot::Sender<()>) {
    let server = GcServer::bind(manager, "127.0.0.1:0".parse().unwrap(), push_interval)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    tokio::spawn(server.serve_until(async move {
        let _ = stop_rx.await;
    }));
    (addr, stop_tx)
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}")).await.unwrap();
    client
}

/// Next text frame parsed as JSON
async fn next_frame(client: &mut Client) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Skip frames until one has the given type
async fn next_of_type(client: &mut Client, kind: &str) -> Value {
    loop {
        let frame = next_frame(client).await;
        if frame["type"] == kind {
            return frame;
        }
    }
}

async fn send(client: &mut Client, value: Value) {
    client.send(Message::Text(value.to_string())).await.unwrap();
}

#[tokio::test]
async fn test_state_pushed_on_connect() {
    let (addr, _stop) = start_server(test_manager(), Duration::from_secs(60)).await;
    let mut client = connect(addr).await;

    let state = next_frame(&mut client).await;
    assert_eq!(state["type"], "state");
    assert_eq!(state["snapshot"]["totalBytes"], 8192);
    assert_eq!(state["snapshot"]["usedBytes"], 6144);
    assert_eq!(state["algorithms"].as_array().unwrap().len(), 4);
    assert_eq!(state["settings"]["memoryThreshold"], 75);
    assert!(state.get("blocks").is_none());
}

#[tokio::test]
async fn test_command_round_trip() {
    let manager = test_manager();
    let (addr, _stop) = start_server(Arc::clone(&manager), Duration::from_secs(60)).await;
    let mut client = connect(addr).await;
    next_of_type(&mut client, "state").await;

    send(&mut client, json!({ "command": "optimizeMemory" })).await;
    let result = next_of_type(&mut client, "result").await;
    assert_eq!(result["command"], "optimizeMemory");
    assert_eq!(result["outcome"], "optimized");
    assert_eq!(result["reclaimedBytes"], 2048);
    assert_eq!(manager.snapshot().used_bytes, 4096);

    send(&mut client, json!({ "command": "explode" })).await;
    let error = next_of_type(&mut client, "error").await;
    assert_eq!(error["code"], "unknown_command");

    send(&mut client, json!({ "command": "getState", "includeBlocks": true })).await;
    let state = next_of_type(&mut client, "state").await;
    assert_eq!(state["blocks"].as_array().unwrap().len(), 3);
    assert_eq!(state["blockCounts"]["fragmented"], 0);
}

#[tokio::test]
async fn test_events_reach_other_clients() {
    let manager = test_manager();
    let (addr, _stop) = start_server(Arc::clone(&manager), Duration::from_secs(60)).await;
    let mut commander = connect(addr).await;
    let mut observer = connect(addr).await;
    next_of_type(&mut commander, "state").await;
    next_of_type(&mut observer, "state").await;

    send(&mut commander, json!({ "command": "runGc" })).await;
    next_of_type(&mut commander, "result").await;

    let event = next_of_type(&mut observer, "event").await;
    assert_eq!(event["event"], "collectionCompleted");
    assert_eq!(event["activity"]["algorithmId"], 1);
    assert_eq!(event["activity"]["id"], 1);
}

#[tokio::test]
async fn test_periodic_state_push() {
    let (addr, _stop) = start_server(test_manager(), Duration::from_millis(50)).await;
    let mut client = connect(addr).await;

    for _ in 0..3 {
        next_of_type(&mut client, "state").await;
    }
}

#[tokio::test]
async fn test_invalid_settings_rejected_over_wire() {
    let manager = test_manager();
    let (addr, _stop) = start_server(Arc::clone(&manager), Duration::from_secs(60)).await;
    let mut client = connect(addr).await;
    next_of_type(&mut client, "state").await;

    send(
        &mut client,
        json!({
            "command": "updateSettings",
            "settings": {
                "autoCollection": true,
                "memoryThreshold": 75,
                "timeInterval": 0,
                "backgroundCollection": false,
                "cpuLimit": 20,
                "collectionPriority": "speed"
            }
        }),
    )
    .await;
    let error = next_of_type(&mut client, "error").await;
    assert_eq!(error["code"], "invalid_settings");
    assert_eq!(manager.settings().time_interval_minutes, 30);
}
