pub mod error;
pub mod store;

use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{exchanges::Exchange, pair::Pair, pricing::Operation};

use self::{error::JobError, store::Store};

/// One of the four statuses a limit order can carry. Only `Pending` and
/// `Filled` are ever produced by the execution path below — the other two
/// are part of the closed set but no code transitions an order into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Filled,
    PartiallyFilled,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitOrder {
    pub order_id: String,
    pub price: Decimal,
    pub amount: Decimal,
    pub timestamp: Option<i64>,
    pub exchange: Exchange,
    pub operation: Operation,
    pub currency_pair: String,
}

fn order_key(order_id: &str) -> String {
    format!("order:{order_id}")
}
fn order_status_key(order_id: &str) -> String {
    format!("order:{order_id}:status")
}
fn order_task_id_key(order_id: &str) -> String {
    format!("order:{order_id}:task_id")
}
fn executed_orders_key(client_id: &str) -> String {
    format!("executed_orders:{client_id}")
}
fn task_status_key(task_id: &str) -> String {
    format!("task:{task_id}:status")
}
fn task_result_key(task_id: &str) -> String {
    format!("task:{task_id}:result")
}

/// The client id every executed order is filed under, regardless of what
/// the request actually named. Preserved from the source as observed.
const EXECUTED_ORDERS_CLIENT_ID: &str = "ABCD";

/// Rejects an order that cannot be routed: an unknown currency pair, or a
/// non-positive price/amount. Nothing is persisted and no job is enqueued
/// when this fails.
fn validate_limit_order(order: &LimitOrder) -> Result<(), JobError> {
    if Pair::from_str(&order.currency_pair).is_err() {
        return Err(JobError::ValidationFailure(format!(
            "unknown currency pair: {}",
            order.currency_pair
        )));
    }
    if order.price <= Decimal::ZERO {
        return Err(JobError::ValidationFailure("price must be positive".to_string()));
    }
    if order.amount <= Decimal::ZERO {
        return Err(JobError::ValidationFailure("amount must be positive".to_string()));
    }
    Ok(())
}

/// The durable background pipeline for simulated limit-order execution.
/// There is no separate broker/worker process: each job is a `tokio::spawn`
/// whose state transitions are persisted to the same key/value store a
/// restarted process would read back, so the durability contract holds
/// even though the work itself runs in-process.
#[derive(Clone)]
pub struct JobQueue {
    store: Arc<dyn Store>,
}

impl JobQueue {
    pub fn new(store: impl Store + 'static) -> Self {
        JobQueue { store: Arc::new(store) }
    }

    /// Submission entry point. Validates the order, stores it and its
    /// PENDING status, then dispatches the delayed execution job and
    /// records its task id. A validation failure enqueues nothing.
    pub async fn send_limit_order(&self, order: LimitOrder) -> Result<(), JobError> {
        validate_limit_order(&order)?;

        let payload = serde_json::to_string(&order)?;
        self.store.set(&order_key(&order.order_id), &payload).await?;
        self.store
            .set(&order_status_key(&order.order_id), "PENDING")
            .await?;

        let delay = rand::thread_rng().gen_range(3..=10);
        let task_id = Uuid::new_v4().simple().to_string();
        self.store.set(&task_status_key(&task_id), "PENDING").await?;

        let store = self.store.clone();
        let order_id = order.order_id.clone();
        tokio::spawn(async move {
            execute_limit_order(&store, &order_id, delay, &task_id).await;
        });

        self.store
            .set(&order_task_id_key(&order.order_id), &task_id)
            .await?;

        Ok(())
    }

    /// Looks up the task dispatched for `order_id` and returns its current
    /// status/result, the same pair a Celery `AsyncResult` would expose.
    pub async fn order_status(&self, order_id: &str) -> Result<(String, String), JobError> {
        let task_id = self.store.get(&order_task_id_key(order_id)).await?;
        let Some(task_id) = task_id else {
            return Ok(("PENDING".to_string(), String::new()));
        };
        let status = self
            .store
            .get(&task_status_key(&task_id))
            .await?
            .unwrap_or_else(|| "PENDING".to_string());
        let result = self
            .store
            .get(&task_result_key(&task_id))
            .await?
            .unwrap_or_default();
        Ok((status, result))
    }

    pub async fn executed_orders(&self, _client_id: &str) -> Result<Vec<String>, JobError> {
        self.store
            .lrange(&executed_orders_key(EXECUTED_ORDERS_CLIENT_ID), 0, -1)
            .await
    }
}

/// Simulated venue latency followed by a fill: reads back the stored order,
/// sleeps `delay` seconds, marks it FILLED, and files the executed order.
/// If the order was never stored, this commits no state change beyond the
/// task's own result.
async fn execute_limit_order(store: &dyn Store, order_id: &str, delay: u64, task_id: &str) {
    let result = match store.get(&order_key(order_id)).await {
        Ok(Some(payload)) => {
            tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
            let set_status = store.set(&order_status_key(order_id), "FILLED").await;
            if let Err(err) = set_status {
                tracing::error!(%order_id, error = %err, "failed to mark order filled");
            }
            if let Err(err) = store
                .lpush(&executed_orders_key(EXECUTED_ORDERS_CLIENT_ID), &payload)
                .await
            {
                tracing::error!(%order_id, error = %err, "failed to file executed order");
            }
            r#"{"status":"Done"}"#.to_string()
        }
        Ok(None) => r#"{"status":"Invalid Order"}"#.to_string(),
        Err(err) => {
            tracing::error!(%order_id, error = %err, "failed to read order for execution");
            r#"{"status":"Invalid Order"}"#.to_string()
        }
    };

    if let Err(err) = store.set(&task_status_key(task_id), "SUCCESS").await {
        tracing::error!(%task_id, error = %err, "failed to record task status");
    }
    if let Err(err) = store.set(&task_result_key(task_id), &result).await {
        tracing::error!(%task_id, error = %err, "failed to record task result");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::store::InMemoryStore;
    use rust_decimal_macros::dec;

    #[test]
    fn executed_orders_key_ignores_caller_client_id() {
        assert_eq!(executed_orders_key("ABCD"), "executed_orders:ABCD");
    }

    #[test]
    fn order_status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&OrderStatus::PartiallyFilled).unwrap();
        assert_eq!(json, "\"PARTIALLY_FILLED\"");
    }

    fn sample_order(order_id: &str) -> LimitOrder {
        LimitOrder {
            order_id: order_id.to_string(),
            price: dec!(100),
            amount: dec!(1),
            timestamp: None,
            exchange: Exchange::Coinbase,
            operation: Operation::Buy,
            currency_pair: "BTCUSD".to_string(),
        }
    }

    // Property: after send_limit_order completes, order:O, order:O:status,
    // and order:O:task_id are all present.
    #[tokio::test]
    async fn send_limit_order_persists_order_status_and_task_id() {
        let store = InMemoryStore::new();
        let queue = JobQueue::new(store.clone());
        let order = sample_order("order-1");

        queue.send_limit_order(order).await.unwrap();

        assert!(store.get(&order_key("order-1")).await.unwrap().is_some());
        assert_eq!(
            store.get(&order_status_key("order-1")).await.unwrap(),
            Some("PENDING".to_string())
        );
        assert!(store.get(&order_task_id_key("order-1")).await.unwrap().is_some());
    }

    // Property: a validation failure enqueues no job — none of the three
    // keys above are ever written.
    #[tokio::test]
    async fn send_limit_order_rejects_non_positive_amount_without_persisting() {
        let store = InMemoryStore::new();
        let queue = JobQueue::new(store.clone());
        let mut order = sample_order("order-2");
        order.amount = dec!(0);

        let err = queue.send_limit_order(order).await.unwrap_err();
        assert!(matches!(err, JobError::ValidationFailure(_)));
        assert!(store.get(&order_key("order-2")).await.unwrap().is_none());
    }

    // Property: after a completed execution, order:O:status == FILLED and a
    // payload for O appears in executed_orders:{client_id}.
    #[tokio::test]
    async fn execute_limit_order_marks_filled_and_files_history() {
        let store = InMemoryStore::new();
        let payload = serde_json::to_string(&sample_order("order-3")).unwrap();
        store.set(&order_key("order-3"), &payload).await.unwrap();
        store.set(&task_status_key("task-3"), "PENDING").await.unwrap();

        execute_limit_order(&store, "order-3", 0, "task-3").await;

        assert_eq!(
            store.get(&order_status_key("order-3")).await.unwrap(),
            Some("FILLED".to_string())
        );
        let history = store
            .lrange(&executed_orders_key(EXECUTED_ORDERS_CLIENT_ID), 0, -1)
            .await
            .unwrap();
        assert_eq!(history, vec![payload]);
        assert_eq!(
            store.get(&task_status_key("task-3")).await.unwrap(),
            Some("SUCCESS".to_string())
        );
    }

    #[tokio::test]
    async fn execute_limit_order_on_missing_order_records_invalid_result() {
        let store = InMemoryStore::new();
        store.set(&task_status_key("task-4"), "PENDING").await.unwrap();

        execute_limit_order(&store, "does-not-exist", 0, "task-4").await;

        assert_eq!(
            store.get(&task_result_key("task-4")).await.unwrap(),
            Some(r#"{"status":"Invalid Order"}"#.to_string())
        );
    }
}
