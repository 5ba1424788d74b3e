pub mod error;
pub mod merger;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::exchanges::Exchange;

/// A single depth-of-book entry: a price, the amount resting there, the
/// venue's timestamp for the level, and which exchange it came from.
/// Value-equal by all four fields — there is no identity beyond them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub price: Decimal,
    pub amount: Decimal,
    pub timestamp: i64,
    pub exchange: Exchange,
}

impl Order {
    pub fn new(price: Decimal, amount: Decimal, timestamp: i64, exchange: Exchange) -> Self {
        Order {
            price,
            amount,
            timestamp,
            exchange,
        }
    }
}

/// A merged view of one trading pair across every polled venue. Bids are
/// kept sorted descending by price, asks ascending, so the best price on
/// either side is always the first element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    pub bids: Vec<Order>,
    pub asks: Vec<Order>,
}
