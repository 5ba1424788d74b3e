use async_trait::async_trait;

use crate::{order_book::Order, pair::Pair};

use super::{
    error::ExchangeError, get_json, row::normalize_rows, Exchange, ExchangeAdapter,
};

pub struct Kraken;

impl Kraken {
    fn result_key(pair: Pair) -> &'static str {
        match pair {
            Pair::BtcUsd => "XXBTZUSD",
            Pair::EthUsd => "XETHZUSD",
        }
    }
}

#[async_trait]
impl ExchangeAdapter for Kraken {
    fn exchange(&self) -> Exchange {
        Exchange::Kraken
    }

    async fn fetch_book(
        &self,
        client: &reqwest::Client,
        pair: Pair,
    ) -> Result<(Vec<Order>, Vec<Order>), ExchangeError> {
        let sym = pair.venue_symbol(Exchange::Kraken);
        let url = format!("https://api.kraken.com/0/public/Depth?pair={sym}");

        let body = get_json(client, &url).await?;

        let result = body
            .get("result")
            .ok_or(ExchangeError::BadResponseShape)?;
        let venue_book = result
            .get(Self::result_key(pair))
            .ok_or(ExchangeError::BadResponseShape)?;

        let bids = venue_book
            .get("bids")
            .and_then(|v| v.as_array())
            .ok_or(ExchangeError::BadResponseShape)?;
        let asks = venue_book
            .get("asks")
            .and_then(|v| v.as_array())
            .ok_or(ExchangeError::BadResponseShape)?;

        Ok((
            normalize_rows(bids, Exchange::Kraken)?,
            normalize_rows(asks, Exchange::Kraken)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_result_key_by_pair() {
        assert_eq!(Kraken::result_key(Pair::BtcUsd), "XXBTZUSD");
        assert_eq!(Kraken::result_key(Pair::EthUsd), "XETHZUSD");
    }
}
