use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{exchanges::Exchange, order_book::Order, pricing::Operation};

#[derive(Debug, Deserialize)]
pub struct OrderBookRequest {
    #[serde(rename = "currencyPair")]
    pub currency_pair: String,
    pub quantity: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderBookResponse {
    pub buy_price: Decimal,
    pub sell_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct LimitOrderRequest {
    #[serde(rename = "currencyPair")]
    pub currency_pair: String,
    pub quantity: Decimal,
    pub operation: Operation,
}

#[derive(Debug, Serialize)]
pub struct LimitOrderResponse {
    pub limit_orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteLimitOrderRequest {
    pub price: Decimal,
    pub amount: Decimal,
    pub timestamp: Option<i64>,
    pub exchange: Exchange,
    pub operation: Operation,
    pub currency_pair: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status")]
pub enum ExecuteLimitOrderResponse {
    #[serde(rename = "SUCCESS")]
    Success { order_id: String },
    #[serde(rename = "FAILED")]
    Failed { error: String },
}

#[derive(Debug, Deserialize)]
pub struct GetLimitOrderStatusRequest {
    #[serde(rename = "orderId")]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct GetLimitOrderStatusResponse {
    pub status: String,
    pub result: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct FailedResponse {
    pub status: &'static str,
    pub error: String,
}

impl FailedResponse {
    pub fn new(error: impl std::fmt::Display) -> Self {
        FailedResponse {
            status: "FAILED",
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetExecutedOrdersRequest {
    #[serde(rename = "clientId")]
    #[allow(dead_code)]
    pub client_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GetExecutedOrdersResponse {
    pub executed_orders: Vec<String>,
}
