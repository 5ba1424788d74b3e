pub mod coinbase;
pub mod error;
pub mod gemini;
pub mod kraken;
pub mod row;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{order_book::Order, pair::Pair};

use self::error::ExchangeError;

/// The closed set of venues this service polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Exchange {
    Coinbase,
    Kraken,
    Gemini,
}

impl Exchange {
    pub fn all() -> [Exchange; 3] {
        [Exchange::Coinbase, Exchange::Kraken, Exchange::Gemini]
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exchange::Coinbase => write!(f, "COINBASE"),
            Exchange::Kraken => write!(f, "KRAKEN"),
            Exchange::Gemini => write!(f, "GEMINI"),
        }
    }
}

/// One venue's depth-of-book capability set: build a URL for a pair, fetch
/// the raw response, and normalize it into canonical `Order` rows. A single
/// `fetch_book` call exercises all three steps — there is no long-lived
/// per-adapter state to hold between polls.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    fn exchange(&self) -> Exchange;

    /// Fetch and normalize this venue's current depth for `pair`, returning
    /// `(bids, asks)` tagged with this adapter's exchange.
    async fn fetch_book(
        &self,
        client: &reqwest::Client,
        pair: Pair,
    ) -> Result<(Vec<Order>, Vec<Order>), ExchangeError>;
}

/// Classify a transport-layer failure: callers need to distinguish a
/// timeout from a refused connection from an HTTP-level error, since only
/// the first two carry any retry signal.
pub(crate) fn classify_transport_error(err: reqwest::Error) -> ExchangeError {
    if err.is_timeout() {
        ExchangeError::UpstreamTimeout(err)
    } else if err.status().is_some() {
        ExchangeError::UpstreamHTTPError(err)
    } else {
        ExchangeError::UpstreamIOError(err)
    }
}

pub(crate) async fn get_json(
    client: &reqwest::Client,
    url: &str,
) -> Result<serde_json::Value, ExchangeError> {
    let response = client
        .get(url)
        .header("Accept-Encoding", "gzip")
        .send()
        .await
        .map_err(classify_transport_error)?;

    let response = response
        .error_for_status()
        .map_err(classify_transport_error)?;

    response
        .json::<serde_json::Value>()
        .await
        .map_err(classify_transport_error)
}

/// All three adapters, ready to be fanned out to concurrently by the
/// scheduler.
pub fn all_adapters() -> Vec<Box<dyn ExchangeAdapter>> {
    vec![
        Box::new(coinbase::Coinbase),
        Box::new(kraken::Kraken),
        Box::new(gemini::Gemini),
    ]
}
