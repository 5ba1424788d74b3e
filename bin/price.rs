use book_router::{config::PriceOpts, error::AggregatorError, pair::Pair, pricing, scheduler};
use clap::Parser;
use rust_decimal::{prelude::FromPrimitive, Decimal};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Format;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let opts = PriceOpts::parse();
    let _tracing_guard = initialize_tracing(&opts.log_file_path, opts.level)?;

    let quantity = Decimal::from_f64(opts.quantity)
        .ok_or_else(|| eyre::eyre!("quantity must be a finite number"))?;

    match run(quantity).await {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::error!(error = %err, "price lookup failed");
            eprintln!("An error occurred, please check {} for more details", "app.log");
            Err(eyre::Report::new(err))
        }
    }
}

async fn run(quantity: Decimal) -> Result<(), AggregatorError> {
    let client = reqwest::Client::new();
    let book = scheduler::fetch_and_merge(&client, Pair::BtcUsd).await?;

    let buy_price = pricing::vwap(&book, pricing::Operation::Buy, quantity)?;
    let sell_price = pricing::vwap(&book, pricing::Operation::Sell, quantity)?;

    println!("To BUY {quantity} BTC: ${:.4}", buy_price * quantity);
    println!("To SELL {quantity} BTC: ${:.4}", sell_price * quantity);

    Ok(())
}

fn initialize_tracing(
    file_path: &str,
    level: tracing::metadata::LevelFilter,
) -> eyre::Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(".", file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let format = Format::default()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_ansi(false)
        .with_level(true)
        .compact();

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .event_format(format)
        .with_writer(non_blocking)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
