//! Integration tests for the generated mutation fields.

mod common;

use async_graphql::Request;
use serde_json::json;

use common::{Harness, RecordingDispatcher, shop_config};

#[tokio::test]
async fn test_command_dispatch_resolves_to_true() {
    let harness = Harness::new(shop_config());

    let mutation = r#"mutation {
        ChangeCart(input: { cartId: "c1", sku: "sku-1", quantity: 2 })
    }"#;
    let response = harness
        .schema
        .execute(Request::new(mutation).data(harness.context()))
        .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data.into_json().unwrap(), json!({"ChangeCart": true}));

    let envelopes = harness.dispatcher.envelopes.lock().unwrap();
    assert_eq!(envelopes.len(), 1);
    let envelope = &envelopes[0];
    assert_eq!(envelope.type_name, "ChangeCart");
    assert_eq!(
        envelope.value,
        json!({"cartId": "c1", "sku": "sku-1", "quantity": 2})
    );
    assert_eq!(envelope.version, 1);
    assert_eq!(envelope.current_user, None);
}

#[tokio::test]
async fn test_command_envelope_carries_current_user() {
    let harness = Harness::new(shop_config());

    let user = json!({"id": "u1", "roles": ["Admin"]});
    let context = {
        let mut context = harness.context();
        context.current_user = Some(user.clone());
        context
    };

    let mutation = r#"mutation {
        ChangeCart(input: { cartId: "c1", sku: "sku-1", quantity: 1 })
    }"#;
    let response = harness.schema.execute(Request::new(mutation).data(context)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let envelopes = harness.dispatcher.envelopes.lock().unwrap();
    assert_eq!(envelopes[0].current_user, Some(user));
}

#[tokio::test]
async fn test_rejected_command_surfaces_as_field_error() {
    let dispatcher = RecordingDispatcher {
        reject_with: Some("quantity must be positive".into()),
        ..RecordingDispatcher::default()
    };
    let harness = Harness::with_mocks(
        shop_config(),
        dispatcher,
        Default::default(),
        Default::default(),
    );

    let mutation = r#"mutation {
        ChangeCart(input: { cartId: "c1", sku: "sku-1", quantity: -1 })
    }"#;
    let response = harness
        .schema
        .execute(Request::new(mutation).data(harness.context()))
        .await;
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("quantity must be positive"));

    // The envelope still reached the dispatcher; rejection happened there.
    assert_eq!(harness.dispatcher.envelopes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_required_input_field_is_rejected_before_dispatch() {
    let harness = Harness::new(shop_config());

    let mutation = r#"mutation { ChangeCart(input: { cartId: "c1" }) }"#;
    let response = harness
        .schema
        .execute(Request::new(mutation).data(harness.context()))
        .await;
    assert!(!response.errors.is_empty());
    assert!(harness.dispatcher.envelopes.lock().unwrap().is_empty());
}
