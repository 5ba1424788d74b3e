use std::future::Future;

use axum::extract::ws::{Message, WebSocket};

/// Drives one accepted connection: `receive -> dispatch -> reply` until the
/// client disconnects or a frame fails to decode as JSON. A decode failure
/// ends the receive loop (and with it the session) rather than being
/// skipped — the source's behavior, preserved rather than "fixed".
pub async fn run<F, Fut>(mut socket: WebSocket, mut handler: F)
where
    F: FnMut(serde_json::Value) -> Fut,
    Fut: Future<Output = Message>,
{
    loop {
        let message = match socket.recv().await {
            Some(Ok(message)) => message,
            _ => break,
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!(error = %err, "JSON decoding error");
                break;
            }
        };

        let reply = handler(value).await;
        if socket.send(reply).await.is_err() {
            break;
        }
    }
}

/// Wraps an endpoint handler to measure wall-clock latency from entry to
/// exit and emit it as a tracing event.
pub async fn with_latency<T>(endpoint: &str, fut: impl Future<Output = T>) -> T {
    let start = std::time::Instant::now();
    let result = fut.await;
    tracing::info!(endpoint, latency_ms = %start.elapsed().as_millis(), "handled message");
    result
}
