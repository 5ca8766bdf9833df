//! SyncClient against the in-process gateway

use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use visual_builder_cslp::decode;
use visual_builder_sync::{
    EventName, Gateway, InstancePosition, MemoryGateway, SyncClient, SyncError, NEW_DISCUSSION_ID,
};

fn client(gateway: &MemoryGateway) -> SyncClient {
    SyncClient::new(Rc::new(gateway.clone()))
}

#[tokio::test]
async fn test_get_field_schema_decodes_tree() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();
    gateway.respond_with(
        EventName::GetFieldSchema,
        json!({
            "fieldSchemaMap": [
                { "uid": "title", "data_type": "text" },
                { "uid": "hero", "data_type": "group", "schema": [] }
            ]
        }),
    );

    let schema = client(&gateway).get_field_schema("page").await?;
    assert_eq!(schema.len(), 2);
    assert_eq!(schema[0].uid, "title");

    let sent = gateway.sent_for(EventName::GetFieldSchema);
    assert_eq!(sent, vec![json!({ "contentTypeUid": "page" })]);
    Ok(())
}

#[tokio::test]
async fn test_missing_response_is_a_payload_error() {
    let gateway = MemoryGateway::new();

    let result = client(&gateway).get_field_schema("page").await;
    assert!(matches!(
        result,
        Err(SyncError::Payload {
            event: EventName::GetFieldSchema,
            ..
        })
    ));
}

#[tokio::test]
async fn test_discussion_id_falls_back_to_new() {
    let gateway = MemoryGateway::new();
    gateway.fail_with(
        EventName::GetDiscussionId,
        SyncError::Transport("channel closed".to_string()),
    );
    let address = decode("page.blt1.en-us.title").unwrap();

    assert_eq!(client(&gateway).get_discussion_id(&address).await, NEW_DISCUSSION_ID);

    gateway.respond_with(EventName::GetDiscussionId, json!({ "discussionId": "d-42" }));
    assert_eq!(client(&gateway).get_discussion_id(&address).await, "d-42");
}

#[tokio::test]
async fn test_pushes_are_recorded() -> anyhow::Result<()> {
    let gateway = MemoryGateway::new();
    let client = client(&gateway);
    let address = decode("page.blt1.en-us.tags.2").unwrap();

    client.update_field(&address, json!("hello")).await?;
    client.move_instance(&address, 2, InstancePosition::Next).await?;
    client.focus_field(vec![address.clone()]).await?;

    let updates = gateway.sent_for(EventName::UpdateField);
    assert_eq!(updates[0]["data"], "hello");
    assert_eq!(updates[0]["fieldMetadata"]["fieldPathWithIndex"], "tags.2");

    let moves = gateway.sent_for(EventName::MoveInstance);
    assert_eq!(moves[0]["index"], 2);
    assert_eq!(moves[0]["direction"], "next");

    let focus = gateway.sent_for(EventName::FocusField);
    assert_eq!(focus[0]["DOMEditStack"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_unregister_removes_handler() {
    let gateway = MemoryGateway::new();
    let calls = Rc::new(Cell::new(0));

    let counter = calls.clone();
    let registration = gateway.on(
        EventName::ScrollToViewFieldByCslpValue,
        Rc::new(move |_: serde_json::Value| counter.set(counter.get() + 1)),
    );

    assert_eq!(gateway.push(EventName::ScrollToViewFieldByCslpValue, json!({})), 1);
    registration.unregister();
    assert_eq!(gateway.push(EventName::ScrollToViewFieldByCslpValue, json!({})), 0);
    assert_eq!(calls.get(), 1);
    assert_eq!(gateway.listener_count(EventName::ScrollToViewFieldByCslpValue), 0);
}
