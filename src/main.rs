//! Locally cached views over eventually consistent subgraph data.
//!
//! Background loops page the upstream subgraphs into immutable in-process
//! snapshots and rebuild derived rollups; the HTTP layer serves whatever is
//! currently committed.


pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod http;
pub mod merge;
pub mod model;
pub mod reader;
pub mod refresh;
pub mod stats;

use std::net::SocketAddr;
use std::sync::Arc;

use cache::AppCache;
use config::Config;
use graph::SubgraphClient;
use reader::SnapshotReader;
use refresh::{refresh_account_stats, refresh_loop, refresh_positions, refresh_transactions};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Starting subgraph cache...");
    log::info!("main subgraph: {}", config.subgraph_url);
    log::info!("transactions subgraph: {}", config.transactions_subgraph_url);
    log::info!(
        "page size: {}, refresh intervals: positions {:?} / transactions {:?} / accounts {:?}",
        config.page_size,
        config.positions_interval,
        config.transactions_interval,
        config.accounts_interval
    );

    let cache = Arc::new(AppCache::new());
    let main_client = Arc::new(SubgraphClient::new(config.subgraph_url.clone())?);
    let transactions_client = Arc::new(SubgraphClient::new(
        config.transactions_subgraph_url.clone(),
    )?);

    {
        let cache = cache.clone();
        let client = main_client.clone();
        let config = config.clone();
        tokio::spawn(async move {
            refresh_loop("positions", config.positions_interval, || {
                let cache = cache.clone();
                let client = client.clone();
                let config = config.clone();
                async move { refresh_positions(client.as_ref(), &cache, &config).await }
            })
            .await;
        });
    }

    {
        let cache = cache.clone();
        let client = transactions_client.clone();
        let config = config.clone();
        tokio::spawn(async move {
            refresh_loop("transactions", config.transactions_interval, || {
                let cache = cache.clone();
                let client = client.clone();
                let config = config.clone();
                async move { refresh_transactions(client.as_ref(), &cache, &config).await }
            })
            .await;
        });
    }

    {
        let cache = cache.clone();
        let client = main_client.clone();
        let config = config.clone();
        tokio::spawn(async move {
            refresh_loop("accounts", config.accounts_interval, || {
                let cache = cache.clone();
                let client = client.clone();
                let config = config.clone();
                async move { refresh_account_stats(client.as_ref(), &cache, &config).await }
            })
            .await;
        });
    }

    let reader = Arc::new(SnapshotReader::new(cache));
    let app = http::router(reader);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("http server listening on {}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("shutdown signal received");
        }
    }

    Ok(())
}
