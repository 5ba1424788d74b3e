use std::fmt;

use serde::{Deserialize, Serialize};

use crate::exchanges::Exchange;

/// A high-level trading symbol the service understands. A closed set —
/// adding a pair means adding a row to [`Pair::venue_symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pair {
    BtcUsd,
    EthUsd,
}

#[derive(thiserror::Error, Debug)]
#[error("unknown currency pair: {0}")]
pub struct UnknownPair(pub String);

impl Pair {
    pub fn all() -> [Pair; 2] {
        [Pair::BtcUsd, Pair::EthUsd]
    }

    /// The venue-specific symbol for this pair on `exchange`.
    pub fn venue_symbol(&self, exchange: Exchange) -> &'static str {
        match (self, exchange) {
            (Pair::BtcUsd, Exchange::Coinbase) => "BTC-USD",
            (Pair::BtcUsd, Exchange::Kraken) => "XBTUSD",
            (Pair::BtcUsd, Exchange::Gemini) => "BTCUSD",
            (Pair::EthUsd, Exchange::Coinbase) => "ETH-USD",
            (Pair::EthUsd, Exchange::Kraken) => "ETHUSD",
            (Pair::EthUsd, Exchange::Gemini) => "ETHUSD",
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pair::BtcUsd => write!(f, "BTCUSD"),
            Pair::EthUsd => write!(f, "ETHUSD"),
        }
    }
}

impl std::str::FromStr for Pair {
    type Err = UnknownPair;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BTCUSD" => Ok(Pair::BtcUsd),
            "ETHUSD" => Ok(Pair::EthUsd),
            other => Err(UnknownPair(other.to_owned())),
        }
    }
}
