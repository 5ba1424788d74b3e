pub mod error;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    exchanges::Exchange,
    order_book::{Book, Order},
};

use self::error::PricingError;

/// Which side of the merged book a price/routing query walks: BUY consumes
/// asks, SELL consumes bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Buy,
    Sell,
}

fn side<'a>(book: &'a Book, operation: Operation) -> &'a [Order] {
    match operation {
        Operation::Buy => &book.asks,
        Operation::Sell => &book.bids,
    }
}

/// Volume-weighted average price for filling `quantity` against `book`.
/// Walks the relevant side top-down, consuming whole levels until the next
/// level would overshoot, then takes a partial fill at that level's price.
/// Returns 0 if nothing could be filled (empty side or zero quantity); if
/// the side's total depth is less than `quantity` the fill is simply over
/// whatever depth exists.
pub fn vwap(book: &Book, operation: Operation, quantity: Decimal) -> Result<Decimal, PricingError> {
    if quantity <= Decimal::ZERO {
        return Err(PricingError::BadRequest);
    }

    let mut filled = Decimal::ZERO;
    let mut cost = Decimal::ZERO;

    for order in side(book, operation) {
        if filled + order.amount <= quantity {
            filled += order.amount;
            cost += order.amount * order.price;
        } else {
            let remaining = quantity - filled;
            filled += remaining;
            cost += remaining * order.price;
            break;
        }
    }

    if filled.is_zero() {
        Ok(Decimal::ZERO)
    } else {
        Ok(cost / filled)
    }
}

/// Per-exchange split of `quantity` across the book, top-down. For each
/// exchange touched, returns one `Order` carrying the total amount taken
/// from it and the price of the last level consumed there — the worst
/// price that venue would fill at if routed as one limit order.
/// `timestamp` is always 0. Exchanges appear in the order they were first
/// touched during the walk.
pub fn best_limit_orders(book: &Book, operation: Operation, quantity: Decimal) -> Vec<Order> {
    let mut order_of_appearance: Vec<Exchange> = Vec::new();
    let mut totals: Vec<(Decimal, Decimal)> = Vec::new(); // (amount, last_price) parallel to order_of_appearance

    let mut filled = Decimal::ZERO;

    for order in side(book, operation) {
        if filled >= quantity {
            break;
        }

        let take = if filled + order.amount <= quantity {
            order.amount
        } else {
            quantity - filled
        };
        filled += take;

        match order_of_appearance.iter().position(|e| *e == order.exchange) {
            Some(idx) => {
                totals[idx].0 += take;
                totals[idx].1 = order.price;
            }
            None => {
                order_of_appearance.push(order.exchange);
                totals.push((take, order.price));
            }
        }
    }

    order_of_appearance
        .into_iter()
        .zip(totals)
        .map(|(exchange, (amount, price))| Order::new(price, amount, 0, exchange))
        .collect()
}
