use clap::Parser;

/// Long-running service process configuration.
#[derive(Parser, Debug)]
#[clap(name = "book-router-server")]
pub struct ServerOpts {
    /// Key/value store connection URL.
    #[clap(long, default_value = "redis://redis:6379/0")]
    pub redis_url: String,

    /// Socket address the WebSocket server binds to.
    #[clap(long, default_value = "0.0.0.0:8000")]
    pub socket_address: String,

    /// Level of logging, options are trace, debug, info, warn, error.
    #[clap(long, default_value = "debug")]
    pub level: tracing::metadata::LevelFilter,

    /// Path to output file for logging.
    #[clap(long, default_value = "app.log")]
    pub log_file_path: String,
}

/// One-shot price CLI configuration.
#[derive(Parser, Debug)]
#[clap(name = "book-router-price")]
pub struct PriceOpts {
    /// Quantity of BTC to price.
    #[clap(long, default_value = "10.0")]
    pub quantity: f64,

    /// Level of logging, options are trace, debug, info, warn, error.
    #[clap(long, default_value = "info")]
    pub level: tracing::metadata::LevelFilter,

    /// Path to output file for logging.
    #[clap(long, default_value = "app.log")]
    pub log_file_path: String,
}
