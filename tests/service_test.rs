mod common;

use std::sync::{Arc, Mutex};

use serde_json::json;

use common::{register_client, settle, start_hub};
use hubcast::{handler, Message, Service, ServiceError};

#[tokio::test]
async fn handler_receives_client_frames() {
    let hub = start_hub();
    let service = Service::new(hub.clone());

    let captured: Arc<Mutex<Option<(String, Message)>>> = Arc::new(Mutex::new(None));
    {
        let captured = captured.clone();
        service
            .register_handler(
                "commands",
                handler(move |client_id: String, msg: Message| {
                    let captured = captured.clone();
                    async move {
                        *captured.lock().unwrap() = Some((client_id, msg));
                        Ok(())
                    }
                }),
            )
            .await;
    }

    let (client, conn) = register_client(&hub, "sender").await;
    tokio::spawn(client.clone().read_pump());

    conn.push_read(
        Message::new("commands")
            .with_event("run")
            .with_field("cmd", json!("test")),
    )
    .await;
    settle().await;

    let captured = captured.lock().unwrap().take().unwrap();
    assert_eq!(captured.0, "sender");
    assert_eq!(captured.1.channel, "commands");
    assert_eq!(captured.1.client_id, "sender");
    assert_eq!(captured.1.data["cmd"], json!("test"));
}

#[tokio::test]
async fn handler_errors_do_not_kill_the_loop() {
    let hub = start_hub();
    let service = Service::new(hub.clone());

    service
        .register_handler(
            "commands",
            handler(|_client_id: String, _msg: Message| async move {
                Err("handler boom".into())
            }),
        )
        .await;

    let (client, conn) = register_client(&hub, "sender").await;
    tokio::spawn(client.clone().read_pump());

    conn.push_read(Message::new("commands").with_event("run")).await;
    settle().await;

    // The hub still serves traffic after the handler failure.
    let (_, conn2) = register_client(&hub, "c2").await;
    service.subscribe("news", "c2").await.unwrap();
    service.publish("news", json!({"headline": "still alive"})).await;
    settle().await;
    assert_eq!(conn2.written().len(), 1);
}

#[tokio::test]
async fn publish_stamps_and_delivers() {
    let hub = start_hub();
    let service = Service::new(hub.clone());

    let (_, conn) = register_client(&hub, "svc-c1").await;
    service.subscribe("news", "svc-c1").await.unwrap();

    service.publish("news", json!({"headline": "test"})).await;
    settle().await;

    let written = conn.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].channel, "news");
    assert_eq!(written[0].event, "message");
    assert!(written[0].client_id.is_empty());
    assert_eq!(written[0].data["headline"], json!("test"));
}

#[tokio::test]
async fn scalar_publish_data_is_wrapped() {
    let hub = start_hub();
    let service = Service::new(hub.clone());

    let (_, conn) = register_client(&hub, "c1").await;
    service.subscribe("news", "c1").await.unwrap();

    service.publish("news", json!("headline")).await;
    settle().await;

    let written = conn.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].data["value"], json!("headline"));
}

#[tokio::test]
async fn subscribe_unknown_client_fails() {
    let hub = start_hub();
    let service = Service::new(hub);

    let err = service.subscribe("ch", "unknown").await.unwrap_err();
    assert!(matches!(err, ServiceError::ClientNotFound { .. }));
}

#[tokio::test]
async fn unsubscribe_unknown_channel_fails() {
    let hub = start_hub();
    let service = Service::new(hub.clone());
    let _ = register_client(&hub, "c1").await;

    let err = service.unsubscribe("nothing", "c1").await.unwrap_err();
    assert!(matches!(err, ServiceError::ChannelNotFound { .. }));
}

#[tokio::test]
async fn send_to_client_direct_and_ghost() {
    let hub = start_hub();
    let service = Service::new(hub.clone());

    let (_, conn) = register_client(&hub, "dm-target").await;

    service
        .send_to_client("dm-target", "dm", json!({"msg": "hi"}))
        .await
        .unwrap();
    settle().await;
    assert_eq!(conn.written().len(), 1);

    let err = service
        .send_to_client("ghost", "dm", json!("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ClientUnreachable { .. }));
}

#[tokio::test]
async fn channel_snapshot_counts_subscribers() {
    let hub = start_hub();
    let service = Service::new(hub.clone());

    let _ = register_client(&hub, "ch-c1").await;
    let _ = register_client(&hub, "ch-c2").await;

    service.subscribe("alpha", "ch-c1").await.unwrap();
    service.subscribe("alpha", "ch-c2").await.unwrap();
    service.subscribe("beta", "ch-c1").await.unwrap();

    let channels = service.channels().await;
    assert_eq!(channels.get("alpha"), Some(&2));
    assert_eq!(channels.get("beta"), Some(&1));
    assert_eq!(service.connected_clients().await.len(), 2);
    assert_eq!(service.client_count().await, 2);
}

#[tokio::test]
async fn admin_surface_lists_and_publishes() {
    let hub = start_hub();
    let service = Service::new(hub.clone());

    let (_, conn) = register_client(&hub, "admin-c1").await;
    let _ = register_client(&hub, "admin-c2").await;
    service.subscribe("beta", "admin-c1").await.unwrap();
    service.subscribe("alpha", "admin-c1").await.unwrap();

    let clients = service.list_clients().await;
    assert_eq!(clients.count, 2);
    assert_eq!(clients.clients.len(), 2);

    let channels = service.list_channels().await;
    assert_eq!(channels.count, 2);
    let names: Vec<&str> = channels.channels.iter().map(|c| c.channel.as_str()).collect();
    assert_eq!(names, ["alpha", "beta"]);

    let receipt = service
        .publish_message("alpha", json!({"k": "v"}))
        .await
        .unwrap();
    assert!(receipt.published);
    assert_eq!(receipt.channel, "alpha");
    settle().await;
    assert_eq!(conn.written().len(), 1);

    let err = service.publish_message("", json!({})).await.unwrap_err();
    assert!(matches!(err, ServiceError::EmptyChannel));
}
