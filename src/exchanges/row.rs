use rust_decimal::Decimal;
use serde_json::Value;

use crate::order_book::Order;

use super::{error::ExchangeError, Exchange};

/// Parse a single bid/ask row into an [`Order`]. A row is either a
/// positional `[price, amount, timestamp]` triple or an object
/// `{price, amount, timestamp}` — any other shape is `BadResponseShape`.
pub fn normalize_row(value: &Value, exchange: Exchange) -> Result<Order, ExchangeError> {
    match value {
        Value::Array(items) if items.len() >= 2 => {
            let price = parse_decimal(&items[0])?;
            let amount = parse_decimal(&items[1])?;
            let timestamp = match items.get(2) {
                Some(v) => parse_i64(v)?,
                None => 0,
            };
            Ok(Order::new(price, amount, timestamp, exchange))
        }
        Value::Object(fields) => {
            let price = parse_decimal(fields.get("price").ok_or(ExchangeError::BadResponseShape)?)?;
            let amount =
                parse_decimal(fields.get("amount").ok_or(ExchangeError::BadResponseShape)?)?;
            let timestamp = match fields.get("timestamp") {
                Some(v) => parse_i64(v)?,
                None => 0,
            };
            Ok(Order::new(price, amount, timestamp, exchange))
        }
        _ => Err(ExchangeError::BadResponseShape),
    }
}

pub fn normalize_rows(
    rows: &[Value],
    exchange: Exchange,
) -> Result<Vec<Order>, ExchangeError> {
    rows.iter().map(|row| normalize_row(row, exchange)).collect()
}

fn parse_decimal(value: &Value) -> Result<Decimal, ExchangeError> {
    match value {
        Value::String(s) => s.parse().map_err(|_| ExchangeError::BadResponseShape),
        Value::Number(n) => n
            .as_f64()
            .and_then(Decimal::from_f64_retain)
            .ok_or(ExchangeError::BadResponseShape),
        _ => Err(ExchangeError::BadResponseShape),
    }
}

fn parse_i64(value: &Value) -> Result<i64, ExchangeError> {
    match value {
        Value::String(s) => s.parse().map_err(|_| ExchangeError::BadResponseShape),
        Value::Number(n) => n.as_i64().ok_or(ExchangeError::BadResponseShape),
        _ => Err(ExchangeError::BadResponseShape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn normalizes_positional_row() {
        let row = json!(["100.5", "1.25", 1690000000]);
        let order = normalize_row(&row, Exchange::Coinbase).unwrap();
        assert_eq!(order.price, dec!(100.5));
        assert_eq!(order.amount, dec!(1.25));
        assert_eq!(order.timestamp, 1690000000);
        assert_eq!(order.exchange, Exchange::Coinbase);
    }

    #[test]
    fn normalizes_keyed_row() {
        let row = json!({"price": "42.0", "amount": "2.0", "timestamp": 5});
        let order = normalize_row(&row, Exchange::Gemini).unwrap();
        assert_eq!(order.price, dec!(42.0));
        assert_eq!(order.amount, dec!(2.0));
    }

    #[test]
    fn rejects_unknown_shape() {
        let row = json!("not a row");
        assert!(matches!(
            normalize_row(&row, Exchange::Kraken),
            Err(ExchangeError::BadResponseShape)
        ));
    }

    #[test]
    fn rejects_short_array() {
        let row = json!(["100.5"]);
        assert!(matches!(
            normalize_row(&row, Exchange::Kraken),
            Err(ExchangeError::BadResponseShape)
        ));
    }
}
