//! Customer data endpoint over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use bistro_client::history::{
    CUSTOMER_DATA_PATH, HistoryError, HistoryOutcome, fetch_customer_data,
};
use bistro_client::transport::HttpTransport;
use bistro_core::OrderStatus;
use bistro_integration_tests::{StubRoute, StubServer, config_for};
use serde_json::json;

#[tokio::test]
async fn test_history_loaded_with_session_cookie() {
    let server = StubServer::start(vec![StubRoute::get(
        CUSTOMER_DATA_PATH,
        200,
        json!({
            "email": "ada@example.com",
            "orders": [{
                "id": 101,
                "items": [{"name": "Margherita", "price": 12.5, "quantity": 2}],
                "total": 25.0,
                "method": "pickup",
                "status": "Completed",
                "created_at": "Sun, 18 Oct 2026 10:30:00 GMT"
            }],
            "private_rooms": [{"id": 9, "date": "2026-11-01", "time": "19:00"}],
            "events": []
        }),
    )])
    .await
    .unwrap();
    let config = config_for(server.base_url(), Some("session=abc")).unwrap();
    let transport = HttpTransport::new(&config).unwrap();

    let HistoryOutcome::Loaded(data) = fetch_customer_data(&transport).await.unwrap() else {
        panic!("expected customer data");
    };

    assert_eq!(data.orders.len(), 1);
    assert_eq!(data.orders[0].status, OrderStatus::Completed);
    assert!(data.orders[0].created_at.is_some());
    assert_eq!(data.private_rooms[0].time.as_deref(), Some("19:00"));
    assert_eq!(server.requests()[0].cookie.as_deref(), Some("session=abc"));
}

#[tokio::test]
async fn test_history_without_session() {
    let server = StubServer::start(vec![StubRoute::get(
        CUSTOMER_DATA_PATH,
        401,
        json!({"error": "Unauthorized"}),
    )])
    .await
    .unwrap();
    let config = config_for(server.base_url(), None).unwrap();
    let transport = HttpTransport::new(&config).unwrap();

    assert_eq!(
        fetch_customer_data(&transport).await.unwrap(),
        HistoryOutcome::LoginRequired
    );
    assert!(server.requests()[0].cookie.is_none());
}

#[tokio::test]
async fn test_history_missing_route_is_an_error() {
    let server = StubServer::start(Vec::new()).await.unwrap();
    let config = config_for(server.base_url(), None).unwrap();
    let transport = HttpTransport::new(&config).unwrap();

    // The stub's 404 body is plain text.
    assert!(matches!(
        fetch_customer_data(&transport).await,
        Err(HistoryError::Transport(_))
    ));
}
