use std::time::Duration;

use futures::future::try_join_all;
use itertools::Itertools;
use tokio::sync::broadcast;

use crate::{
    exchanges::{all_adapters, ExchangeAdapter},
    order_book::{merger, Order},
    pair::Pair,
    registry::BookRegistry,
};

/// Fetch every adapter's book for `pair` concurrently and merge the results.
/// Any single adapter failure aborts the whole refresh — there is no
/// partial merge.
pub async fn fetch_and_merge(
    client: &reqwest::Client,
    pair: Pair,
) -> Result<crate::order_book::Book, crate::exchanges::error::ExchangeError> {
    let adapters: Vec<Box<dyn ExchangeAdapter>> = all_adapters();
    let fetches = adapters.iter().map(|adapter| adapter.fetch_book(client, pair));
    let per_venue: Vec<(Vec<Order>, Vec<Order>)> = try_join_all(fetches).await?;
    Ok(merger::merge(&per_venue))
}

/// The fixed cadences the source app polls at, seconds.
const INTERVALS_SECS: [u64; 3] = [1, 2, 3];

/// Build the ordered `(interval, pair)` work list: every permutation of
/// length `pairs.len()` drawn from `intervals`, zipped against `pairs`.
/// This produces redundant overlapping refreshers of the same pair at
/// different cadences — preserved as observed, not a design we chose.
fn refresh_plan(pairs: &[Pair]) -> Vec<(u64, Pair)> {
    let mut plan = Vec::new();
    for comb in INTERVALS_SECS.iter().copied().permutations(pairs.len()) {
        for (interval, pair) in comb.into_iter().zip(pairs.iter().copied()) {
            plan.push((interval, pair));
        }
    }
    plan
}

/// Runs one (interval, pair) refresher until `shutdown` fires: sleep,
/// fetch-and-merge, publish on success, log and leave the registry
/// untouched on failure.
async fn run_refresher(
    client: reqwest::Client,
    registry: BookRegistry,
    interval: u64,
    pair: Pair,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval)) => {}
            _ = shutdown.recv() => break,
        }

        match fetch_and_merge(&client, pair).await {
            Ok(book) => registry.put(pair, book),
            Err(err) => {
                tracing::warn!(%pair, %interval, error = %err, "refresh failed, registry left unchanged");
            }
        }
    }
}

/// Spawns every refresher in the plan, returning their join handles so the
/// caller can await clean shutdown.
pub fn spawn_all(
    client: reqwest::Client,
    registry: BookRegistry,
    pairs: &[Pair],
    shutdown: &broadcast::Sender<()>,
) -> Vec<tokio::task::JoinHandle<()>> {
    refresh_plan(pairs)
        .into_iter()
        .map(|(interval, pair)| {
            let client = client.clone();
            let registry = registry.clone();
            let shutdown_rx = shutdown.subscribe();
            tokio::spawn(run_refresher(client, registry, interval, pair, shutdown_rx))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_plan_zips_every_permutation_with_pairs() {
        let plan = refresh_plan(&[Pair::BtcUsd, Pair::EthUsd]);
        // 3 intervals taken 2 at a time, ordered: 3*2 = 6 permutations,
        // each zipped with the 2-pair list.
        assert_eq!(plan.len(), 12);
        assert!(plan.iter().any(|(_, p)| *p == Pair::BtcUsd));
        assert!(plan.iter().any(|(_, p)| *p == Pair::EthUsd));
    }
}
