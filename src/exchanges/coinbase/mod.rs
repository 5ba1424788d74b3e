use async_trait::async_trait;

use crate::{order_book::Order, pair::Pair};

use super::{
    error::ExchangeError, get_json, row::normalize_rows, Exchange, ExchangeAdapter,
};

pub struct Coinbase;

#[async_trait]
impl ExchangeAdapter for Coinbase {
    fn exchange(&self) -> Exchange {
        Exchange::Coinbase
    }

    async fn fetch_book(
        &self,
        client: &reqwest::Client,
        pair: Pair,
    ) -> Result<(Vec<Order>, Vec<Order>), ExchangeError> {
        let sym = pair.venue_symbol(Exchange::Coinbase);
        let url = format!("https://api.pro.coinbase.com/products/{sym}/book?level=2");

        let body = get_json(client, &url).await?;

        let bids = body
            .get("bids")
            .and_then(|v| v.as_array())
            .ok_or(ExchangeError::BadResponseShape)?;
        let asks = body
            .get("asks")
            .and_then(|v| v.as_array())
            .ok_or(ExchangeError::BadResponseShape)?;

        Ok((
            normalize_rows(bids, Exchange::Coinbase)?,
            normalize_rows(asks, Exchange::Coinbase)?,
        ))
    }
}
