pub mod error;
pub mod messages;
pub mod session;

use std::str::FromStr;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::{
    jobs::{JobQueue, LimitOrder},
    order_book::error::OrderBookError,
    pair::Pair,
    pricing::{self, Operation},
    registry::BookRegistry,
};

use self::error::ServerError;

use self::messages::{
    ExecuteLimitOrderRequest, ExecuteLimitOrderResponse, FailedResponse,
    GetExecutedOrdersRequest, GetExecutedOrdersResponse, GetLimitOrderStatusRequest,
    GetLimitOrderStatusResponse, LimitOrderRequest, LimitOrderResponse, OrderBookRequest,
    OrderBookResponse,
};

#[derive(Clone)]
pub struct AppState {
    pub registry: BookRegistry,
    pub jobs: JobQueue,
}

/// Builds the router: five `/ws/*` endpoints, allow-all CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws/order-book", get(order_book_ws))
        .route("/ws/limit-order", get(limit_order_ws))
        .route("/ws/execute-limit-order", get(execute_limit_order_ws))
        .route("/ws/get-limit-order-status", get(get_limit_order_status_ws))
        .route("/ws/get-executed-orders", get(get_executed_orders_ws))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn text_error(err: impl std::fmt::Display) -> Message {
    Message::Text(format!("Error: {err}"))
}

fn json_message(value: &impl serde::Serialize) -> Message {
    match serde_json::to_string(value) {
        Ok(text) => Message::Text(text),
        Err(err) => text_error(err),
    }
}

async fn order_book_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_order_book(socket, state))
}

async fn handle_order_book(socket: WebSocket, state: AppState) {
    session::run(socket, move |value| {
        let state = state.clone();
        async move { session::with_latency("order-book", order_book_reply(&state, value)).await }
    })
    .await;
}

async fn order_book_reply(state: &AppState, value: serde_json::Value) -> Message {
    let request: OrderBookRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => return text_error(err),
    };

    match order_book_logic(state, request) {
        Ok(response) => json_message(&response),
        Err(err) => text_error(err),
    }
}

fn order_book_logic(
    state: &AppState,
    request: OrderBookRequest,
) -> Result<OrderBookResponse, ServerError> {
    let pair = Pair::from_str(&request.currency_pair)
        .map_err(|err| ServerError::BadRequest(err.to_string()))?;

    let book = state
        .registry
        .get(pair)
        .ok_or_else(|| ServerError::OrderBook(OrderBookError::RegistryMiss(request.currency_pair)))?;

    let buy_price = pricing::vwap(&book, Operation::Buy, request.quantity)?;
    let sell_price = pricing::vwap(&book, Operation::Sell, request.quantity)?;

    Ok(OrderBookResponse {
        buy_price: buy_price * request.quantity,
        sell_price: sell_price * request.quantity,
    })
}

async fn limit_order_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_limit_order(socket, state))
}

async fn handle_limit_order(socket: WebSocket, state: AppState) {
    session::run(socket, move |value| {
        let state = state.clone();
        async move { session::with_latency("limit-order", limit_order_reply(&state, value)).await }
    })
    .await;
}

async fn limit_order_reply(state: &AppState, value: serde_json::Value) -> Message {
    let request: LimitOrderRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => return text_error(err),
    };

    match limit_order_logic(state, request) {
        Ok(response) => json_message(&response),
        Err(err) => text_error(err),
    }
}

fn limit_order_logic(
    state: &AppState,
    request: LimitOrderRequest,
) -> Result<LimitOrderResponse, ServerError> {
    let pair = Pair::from_str(&request.currency_pair)
        .map_err(|err| ServerError::BadRequest(err.to_string()))?;

    // A missing book is not an error here: the routing list is simply left
    // empty rather than the request failing.
    let limit_orders = match state.registry.get(pair) {
        Some(book) => pricing::best_limit_orders(&book, request.operation, request.quantity),
        None => Vec::new(),
    };

    Ok(LimitOrderResponse { limit_orders })
}

async fn execute_limit_order_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_execute_limit_order(socket, state))
}

async fn handle_execute_limit_order(socket: WebSocket, state: AppState) {
    session::run(socket, move |value| {
        let state = state.clone();
        async move {
            session::with_latency("execute-limit-order", execute_limit_order_reply(&state, value))
                .await
        }
    })
    .await;
}

async fn execute_limit_order_reply(state: &AppState, value: serde_json::Value) -> Message {
    let request: ExecuteLimitOrderRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => {
            return json_message(&ExecuteLimitOrderResponse::Failed { error: err.to_string() })
        }
    };

    let order_id = Uuid::new_v4().simple().to_string();
    let order = LimitOrder {
        order_id: order_id.clone(),
        price: request.price,
        amount: request.amount,
        timestamp: request.timestamp,
        exchange: request.exchange,
        operation: request.operation,
        currency_pair: request.currency_pair,
    };

    match execute_limit_order_logic(state, order).await {
        Ok(()) => json_message(&ExecuteLimitOrderResponse::Success { order_id }),
        Err(err) => json_message(&ExecuteLimitOrderResponse::Failed { error: err.to_string() }),
    }
}

async fn execute_limit_order_logic(state: &AppState, order: LimitOrder) -> Result<(), ServerError> {
    state.jobs.send_limit_order(order).await?;
    Ok(())
}

async fn get_limit_order_status_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_get_limit_order_status(socket, state))
}

async fn handle_get_limit_order_status(socket: WebSocket, state: AppState) {
    session::run(socket, move |value| {
        let state = state.clone();
        async move {
            session::with_latency(
                "get-limit-order-status",
                get_limit_order_status_reply(&state, value),
            )
            .await
        }
    })
    .await;
}

async fn get_limit_order_status_reply(state: &AppState, value: serde_json::Value) -> Message {
    let request: GetLimitOrderStatusRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => return json_message(&FailedResponse::new(err)),
    };

    match get_limit_order_status_logic(state, &request.order_id).await {
        Ok((status, result)) => json_message(&GetLimitOrderStatusResponse {
            status,
            result,
            order_id: request.order_id,
        }),
        Err(err) => json_message(&FailedResponse::new(err)),
    }
}

async fn get_limit_order_status_logic(
    state: &AppState,
    order_id: &str,
) -> Result<(String, String), ServerError> {
    Ok(state.jobs.order_status(order_id).await?)
}

async fn get_executed_orders_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_get_executed_orders(socket, state))
}

async fn handle_get_executed_orders(socket: WebSocket, state: AppState) {
    session::run(socket, move |value| {
        let state = state.clone();
        async move {
            session::with_latency(
                "get-executed-orders",
                get_executed_orders_reply(&state, value),
            )
            .await
        }
    })
    .await;
}

async fn get_executed_orders_reply(state: &AppState, value: serde_json::Value) -> Message {
    // The client id in the request is parsed but, per the source, never
    // actually used — every history read and write is filed under a
    // single hardcoded id.
    let request: GetExecutedOrdersRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(err) => return json_message(&FailedResponse::new(err)),
    };

    match get_executed_orders_logic(state, request.client_id.as_deref().unwrap_or_default()).await {
        Ok(executed_orders) => json_message(&GetExecutedOrdersResponse { executed_orders }),
        Err(err) => json_message(&FailedResponse::new(err)),
    }
}

async fn get_executed_orders_logic(
    state: &AppState,
    client_id: &str,
) -> Result<Vec<String>, ServerError> {
    Ok(state.jobs.executed_orders(client_id).await?)
}
