use book_router::{
    config::ServerOpts,
    error::AggregatorError,
    jobs::{store::KvStore, JobQueue},
    pair::Pair,
    registry::BookRegistry,
    scheduler,
    server::{self, error::ServerError, AppState},
};
use clap::Parser;
use tokio::{net::TcpListener, sync::broadcast};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Format;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let opts = ServerOpts::parse();
    let _tracing_guard = initialize_tracing(&opts.log_file_path, opts.level)?;

    let registry = BookRegistry::init();
    let client = reqwest::Client::new();
    let jobs = JobQueue::new(KvStore::new(&opts.redis_url).map_err(AggregatorError::from)?);

    let (shutdown_tx, _) = broadcast::channel(1);
    let pairs = Pair::all();
    let refresh_handles = scheduler::spawn_all(client, registry.clone(), &pairs, &shutdown_tx);

    let state = AppState { registry: registry.clone(), jobs };
    let app = server::router(state);

    let listener = TcpListener::bind(&opts.socket_address)
        .await
        .map_err(|err| AggregatorError::from(ServerError::Bind(err)))?;
    tracing::info!(address = %opts.socket_address, "serving");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AggregatorError::from(ServerError::Serve(err)));

    let _ = shutdown_tx.send(());
    for handle in refresh_handles {
        let _ = handle.await;
    }
    registry.flush();

    result.map_err(eyre::Report::new)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
