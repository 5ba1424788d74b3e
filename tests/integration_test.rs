use std::net::SocketAddr;

use book_router::{
    exchanges::Exchange,
    jobs::{store::InMemoryStore, JobQueue},
    order_book::{Book, Order},
    pair::Pair,
    registry::BookRegistry,
    server::{self, AppState},
};
use futures::{SinkExt, StreamExt};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

async fn spawn_test_server() -> SocketAddr {
    let registry = BookRegistry::init();
    registry.put(
        Pair::BtcUsd,
        Book {
            bids: vec![],
            asks: vec![
                Order::new(dec!(100.0), dec!(1.0), 0, Exchange::Coinbase),
                Order::new(dec!(101.0), dec!(2.0), 0, Exchange::Kraken),
                Order::new(dec!(102.0), dec!(5.0), 0, Exchange::Gemini),
            ],
        },
    );

    let jobs = JobQueue::new(InMemoryStore::new());
    let state = AppState { registry, jobs };
    let app = server::router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn order_book_endpoint_returns_vwap_totals() {
    let addr = spawn_test_server().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/order-book"))
        .await
        .expect("connects");

    ws.send(Message::Text(
        serde_json::json!({"currencyPair": "BTCUSD", "quantity": 2.0}).to_string(),
    ))
    .await
    .unwrap();

    let response = ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();

    // S1: (1.0*100 + 1.0*101) / 2.0 = 100.5, times quantity 2.0 = 201.0
    let buy_price: Decimal = body["buy_price"].as_str().unwrap().parse().unwrap();
    assert_eq!(buy_price, dec!(201.0));
}

#[tokio::test]
async fn unknown_pair_reports_inline_error_without_closing_session() {
    let addr = spawn_test_server().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/order-book"))
        .await
        .expect("connects");

    ws.send(Message::Text(
        serde_json::json!({"currencyPair": "XRPUSD", "quantity": 1.0}).to_string(),
    ))
    .await
    .unwrap();

    let response = ws.next().await.unwrap().unwrap();
    assert!(response.to_text().unwrap().starts_with("Error:"));

    // session stays open: a second, valid message still gets answered.
    ws.send(Message::Text(
        serde_json::json!({"currencyPair": "BTCUSD", "quantity": 2.0}).to_string(),
    ))
    .await
    .unwrap();
    let response = ws.next().await.unwrap().unwrap();
    assert!(response.to_text().unwrap().contains("buy_price"));
}

#[tokio::test]
async fn malformed_json_ends_the_session() {
    let addr = spawn_test_server().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/order-book"))
        .await
        .expect("connects");

    ws.send(Message::Text("not json".to_string())).await.unwrap();

    // the server closes rather than replying.
    let next = ws.next().await;
    match next {
        None => {}
        Some(Ok(Message::Close(_))) => {}
        other => panic!("expected session to end, got {other:?}"),
    }
}

#[tokio::test]
async fn limit_order_endpoint_splits_quantity_across_exchanges() {
    let addr = spawn_test_server().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/limit-order"))
        .await
        .expect("connects");

    ws.send(Message::Text(
        serde_json::json!({"currencyPair": "BTCUSD", "quantity": 2.5, "operation": "BUY"})
            .to_string(),
    ))
    .await
    .unwrap();

    let response = ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();
    let orders = body["limit_orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
}

#[tokio::test]
async fn execute_limit_order_endpoint_accepts_a_valid_order() {
    let addr = spawn_test_server().await;
    let (mut ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/execute-limit-order"))
            .await
            .expect("connects");

    ws.send(Message::Text(
        serde_json::json!({
            "price": 100.0,
            "amount": 1.0,
            "timestamp": null,
            "exchange": "COINBASE",
            "operation": "BUY",
            "currencyPair": "BTCUSD",
        })
        .to_string(),
    ))
    .await
    .unwrap();

    let response = ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();
    assert_eq!(body["status"], "SUCCESS");
    assert!(body["order_id"].as_str().is_some());
}

#[tokio::test]
async fn execute_limit_order_endpoint_rejects_a_non_positive_amount() {
    let addr = spawn_test_server().await;
    let (mut ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/execute-limit-order"))
            .await
            .expect("connects");

    ws.send(Message::Text(
        serde_json::json!({
            "price": 100.0,
            "amount": 0.0,
            "timestamp": null,
            "exchange": "COINBASE",
            "operation": "BUY",
            "currencyPair": "BTCUSD",
        })
        .to_string(),
    ))
    .await
    .unwrap();

    let response = ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();
    assert_eq!(body["status"], "FAILED");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn execute_limit_order_endpoint_rejects_a_request_missing_a_field() {
    let addr = spawn_test_server().await;
    let (mut ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/execute-limit-order"))
            .await
            .expect("connects");

    // no "price" field at all.
    ws.send(Message::Text(
        serde_json::json!({
            "amount": 1.0,
            "timestamp": null,
            "exchange": "COINBASE",
            "operation": "BUY",
            "currencyPair": "BTCUSD",
        })
        .to_string(),
    ))
    .await
    .unwrap();

    let response = ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();
    assert_eq!(body["status"], "FAILED");
    assert!(body["error"].as_str().is_some());

    // the session stays open and a well-formed request still works.
    ws.send(Message::Text(
        serde_json::json!({
            "price": 100.0,
            "amount": 1.0,
            "timestamp": null,
            "exchange": "COINBASE",
            "operation": "BUY",
            "currencyPair": "BTCUSD",
        })
        .to_string(),
    ))
    .await
    .unwrap();
    let response = ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();
    assert_eq!(body["status"], "SUCCESS");
}

#[tokio::test]
async fn get_limit_order_status_endpoint_reports_pending_right_after_submission() {
    let addr = spawn_test_server().await;
    let (mut execute_ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/execute-limit-order"))
            .await
            .expect("connects");

    execute_ws
        .send(Message::Text(
            serde_json::json!({
                "price": 100.0,
                "amount": 1.0,
                "timestamp": null,
                "exchange": "COINBASE",
                "operation": "BUY",
                "currencyPair": "BTCUSD",
            })
            .to_string(),
        ))
        .await
        .unwrap();
    let response = execute_ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();
    let order_id = body["order_id"].as_str().unwrap().to_string();

    let (mut status_ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/get-limit-order-status"))
            .await
            .expect("connects");
    status_ws
        .send(Message::Text(
            serde_json::json!({"orderId": order_id}).to_string(),
        ))
        .await
        .unwrap();

    let response = status_ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();
    // the simulated fill sleeps at least 3 seconds, so right after submission
    // the task is still pending.
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["orderId"], order_id);
}

#[tokio::test]
async fn get_executed_orders_endpoint_is_empty_before_any_fill() {
    let addr = spawn_test_server().await;
    let (mut execute_ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/execute-limit-order"))
            .await
            .expect("connects");
    execute_ws
        .send(Message::Text(
            serde_json::json!({
                "price": 100.0,
                "amount": 1.0,
                "timestamp": null,
                "exchange": "COINBASE",
                "operation": "BUY",
                "currencyPair": "BTCUSD",
            })
            .to_string(),
        ))
        .await
        .unwrap();
    execute_ws.next().await.unwrap().unwrap();

    let (mut history_ws, _) =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws/get-executed-orders"))
            .await
            .expect("connects");
    history_ws
        .send(Message::Text(serde_json::json!({"clientId": "ABCD"}).to_string()))
        .await
        .unwrap();

    let response = history_ws.next().await.unwrap().unwrap();
    let body: serde_json::Value = serde_json::from_str(response.to_text().unwrap()).unwrap();
    assert_eq!(body["executed_orders"].as_array().unwrap().len(), 0);
}
