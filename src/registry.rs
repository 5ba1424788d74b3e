use std::sync::Arc;

use dashmap::DashMap;

use crate::{order_book::Book, pair::Pair};

/// Process-wide pair→latest-merged-book mapping. Readers and the scheduler's
/// refresh tasks operate on it concurrently; `put` replaces a pair's whole
/// entry atomically so a reader never observes a torn merge.
#[derive(Clone, Default)]
pub struct BookRegistry {
    books: Arc<DashMap<Pair, Book>>,
}

impl BookRegistry {
    /// Idempotent: a fresh `BookRegistry` is already an empty map.
    pub fn init() -> Self {
        BookRegistry::default()
    }

    pub fn get(&self, pair: Pair) -> Option<Book> {
        self.books.get(&pair).map(|entry| entry.value().clone())
    }

    pub fn put(&self, pair: Pair, book: Book) {
        self.books.insert(pair, book);
    }

    pub fn flush(&self) {
        self.books.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::Exchange;
    use crate::order_book::Order;
    use rust_decimal_macros::dec;

    #[test]
    fn absent_pair_reads_as_none() {
        let registry = BookRegistry::init();
        assert!(registry.get(Pair::BtcUsd).is_none());
    }

    #[test]
    fn put_overwrites_in_place() {
        let registry = BookRegistry::init();
        let first = Book {
            bids: vec![Order::new(dec!(1), dec!(1), 0, Exchange::Coinbase)],
            asks: vec![],
        };
        registry.put(Pair::BtcUsd, first.clone());
        assert_eq!(registry.get(Pair::BtcUsd).unwrap().bids, first.bids);

        let second = Book {
            bids: vec![Order::new(dec!(2), dec!(2), 0, Exchange::Kraken)],
            asks: vec![],
        };
        registry.put(Pair::BtcUsd, second.clone());
        assert_eq!(registry.get(Pair::BtcUsd).unwrap().bids, second.bids);
    }

    #[test]
    fn flush_clears_all_entries() {
        let registry = BookRegistry::init();
        registry.put(Pair::BtcUsd, Book::default());
        registry.put(Pair::EthUsd, Book::default());
        registry.flush();
        assert!(registry.get(Pair::BtcUsd).is_none());
        assert!(registry.get(Pair::EthUsd).is_none());
    }
}
