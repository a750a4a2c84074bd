mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use common::{register_client, settle, start_hub};
use hubcast::{
    BroadcastTarget, BusRelay, Envelope, MemoryBus, MemoryTransport, Message, Relay, RelayConfig,
    RelayTransport, Service,
};

/// Records everything a relay ingress delivers.
struct RecordingTarget {
    received: Mutex<Vec<Message>>,
}

impl RecordingTarget {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            received: Mutex::new(Vec::new()),
        })
    }

    fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl BroadcastTarget for RecordingTarget {
    async fn broadcast_to_local(&self, msg: Message) {
        self.received.lock().unwrap().push(msg);
    }
}

fn relay_over(bus: &Arc<MemoryBus>, target: Arc<dyn BroadcastTarget>) -> BusRelay {
    BusRelay::new(
        &RelayConfig::default(),
        Arc::new(MemoryTransport::new(bus.clone())),
        target,
    )
}

#[tokio::test]
async fn envelope_round_trip() {
    let envelope = Envelope {
        instance_id: "instance-a".to_string(),
        message: Message::new("updates")
            .with_event("sync")
            .with_field("key", json!("value"))
            .with_client_id("c-1"),
    };
    let encoded = serde_json::to_string(&envelope).unwrap();
    let decoded: Envelope = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, envelope);
}

#[tokio::test]
async fn ingress_suppresses_own_messages() {
    let bus = MemoryBus::new();
    let target_a = RecordingTarget::new();
    let target_b = RecordingTarget::new();

    let relay_a = relay_over(&bus, target_a.clone());
    let relay_b = relay_over(&bus, target_b.clone());
    assert_ne!(relay_a.instance_id(), relay_b.instance_id());

    relay_a.start().await.unwrap();
    relay_b.start().await.unwrap();

    let msg = Message::new("updates")
        .with_event("sync")
        .with_field("seq", json!(1));
    relay_a.publish(&msg).await.unwrap();
    settle().await;

    // The publisher's own ingress discards; the peer delivers exactly once.
    assert!(target_a.received().is_empty());
    let received = target_b.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].channel, "updates");
    assert_eq!(received[0].event, "sync");
    assert_eq!(received[0].data["seq"], json!(1));
}

#[tokio::test]
async fn availability_tracks_lifecycle() {
    let bus = MemoryBus::new();
    let relay = relay_over(&bus, RecordingTarget::new());

    assert!(!relay.available());
    relay.start().await.unwrap();
    assert!(relay.available());
    relay.stop().await.unwrap();
    assert!(!relay.available());
}

#[tokio::test]
async fn undecodable_payloads_are_skipped() {
    let bus = MemoryBus::new();
    let target = RecordingTarget::new();
    let relay = relay_over(&bus, target.clone());
    relay.start().await.unwrap();

    let publisher = MemoryTransport::new(bus.clone());
    publisher
        .publish("orchestra:ws:broadcast", b"not json".to_vec())
        .await
        .unwrap();

    let peer = relay_over(&bus, RecordingTarget::new());
    peer.publish(&Message::new("updates").with_event("after"))
        .await
        .unwrap();
    settle().await;

    // The garbage payload is skipped; the valid one still arrives.
    let received = target.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].event, "after");
}

#[tokio::test]
async fn stopped_ingress_delivers_nothing() {
    let bus = MemoryBus::new();
    let target = RecordingTarget::new();
    let relay = relay_over(&bus, target.clone());
    relay.start().await.unwrap();
    relay.stop().await.unwrap();

    let peer = relay_over(&bus, RecordingTarget::new());
    peer.publish(&Message::new("updates")).await.unwrap();
    settle().await;

    assert!(target.received().is_empty());
}

#[tokio::test]
async fn publish_mirrors_across_hubs_without_echo() {
    let bus = MemoryBus::new();
    let hub_a = start_hub();
    let hub_b = start_hub();

    let relay_a = Arc::new(relay_over(&bus, hub_a.clone() as Arc<dyn BroadcastTarget>));
    let relay_b = Arc::new(relay_over(&bus, hub_b.clone() as Arc<dyn BroadcastTarget>));
    relay_a.start().await.unwrap();
    relay_b.start().await.unwrap();
    hub_a.set_relay(relay_a.clone()).await;
    hub_b.set_relay(relay_b.clone()).await;

    let (_, conn_a) = register_client(&hub_a, "a1").await;
    let (_, conn_b) = register_client(&hub_b, "b1").await;
    assert!(hub_a.subscribe("updates", "a1").await);
    assert!(hub_b.subscribe("updates", "b1").await);

    let service = Service::new(hub_a.clone());
    service.publish("updates", json!({"state": "ready"})).await;
    settle().await;
    settle().await;

    // One delivery on each side: local fan-out on A, relayed cast on B.
    // A's own ingress discarded the echo, so no duplicate on A.
    assert_eq!(conn_a.written().len(), 1);
    assert_eq!(conn_b.written().len(), 1);
    assert_eq!(conn_b.written()[0].data["state"], json!("ready"));
}

#[tokio::test]
async fn unavailable_relay_does_not_block_local_fanout() {
    let bus = MemoryBus::new();
    let hub = start_hub();

    // Attached but never started: the hub must skip it.
    let relay = Arc::new(relay_over(&bus, hub.clone() as Arc<dyn BroadcastTarget>));
    hub.set_relay(relay).await;

    let (_, conn) = register_client(&hub, "c1").await;
    assert!(hub.subscribe("updates", "c1").await);

    hub.publish("updates", Message::new("updates").with_event("test"))
        .await;
    settle().await;

    assert_eq!(conn.written().len(), 1);
}
