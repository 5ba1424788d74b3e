use super::{Book, Order};

/// Combine several per-venue `(bids, asks)` pairs into one sorted `Book`.
/// Bids descending by price, asks ascending; ties keep their input order,
/// since the sort is stable.
pub fn merge(per_venue: &[(Vec<Order>, Vec<Order>)]) -> Book {
    let mut bids: Vec<Order> = per_venue.iter().flat_map(|(b, _)| b.clone()).collect();
    let mut asks: Vec<Order> = per_venue.iter().flat_map(|(_, a)| a.clone()).collect();

    bids.sort_by(|a, b| b.price.cmp(&a.price));
    asks.sort_by(|a, b| a.price.cmp(&b.price));

    Book { bids, asks }
}
