use crate::{
    exchanges::error::ExchangeError, jobs::error::JobError, order_book::error::OrderBookError,
    pricing::error::PricingError, server::error::ServerError,
};

#[derive(thiserror::Error, Debug)]
pub enum AggregatorError {
    #[error("exchange error")]
    Exchange(#[from] ExchangeError),
    #[error("order book error")]
    OrderBook(#[from] OrderBookError),
    #[error("pricing error")]
    Pricing(#[from] PricingError),
    #[error("job error")]
    Job(#[from] JobError),
    #[error("server error")]
    Server(#[from] ServerError),
}
