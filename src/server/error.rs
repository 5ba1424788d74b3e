#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    OrderBook(#[from] crate::order_book::error::OrderBookError),
    #[error(transparent)]
    Pricing(#[from] crate::pricing::error::PricingError),
    #[error(transparent)]
    Job(#[from] crate::jobs::error::JobError),
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),
    #[error(transparent)]
    Serve(#[from] std::io::Error),
}
