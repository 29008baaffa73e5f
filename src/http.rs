//! HTTP read API over the snapshot cache.
//!
//! Every endpoint answers out of the committed snapshots; no request ever
//! waits on an upstream fetch. Wide integers (prices, rebates) are rendered
//! as decimal strings since they exceed what JSON numbers carry exactly.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::cache::AccountStatsMap;
use crate::model::{PawnshopPosition, TransactionRecord};
use crate::reader::SnapshotReader;
use crate::stats::AccountStats;

/// Windowing parameters shared by the collection endpoints.
#[derive(Debug, Deserialize)]
struct PageParams {
    #[serde(default)]
    skip: usize,

    #[serde(default = "default_first")]
    first: usize,
}

fn default_first() -> usize {
    10_000
}

pub fn router(reader: Arc<SnapshotReader>) -> Router {
    Router::new()
        .route("/pawnshop-positions", get(pawnshop_positions))
        .route("/transactions", get(transactions))
        .route("/min-prices", get(min_prices))
        .route("/weekly-rebates", get(weekly_rebates))
        .route("/account-stats", get(all_account_stats))
        .route("/account-stats/:id", get(account_stats))
        .with_state(reader)
}

async fn pawnshop_positions(
    State(reader): State<Arc<SnapshotReader>>,
    Query(params): Query<PageParams>,
) -> Json<Vec<PawnshopPosition>> {
    Json(reader.positions_slice(params.skip, params.first))
}

async fn transactions(
    State(reader): State<Arc<SnapshotReader>>,
    Query(params): Query<PageParams>,
) -> Json<Vec<TransactionRecord>> {
    Json(reader.transactions_slice(params.skip, params.first))
}

async fn min_prices(State(reader): State<Arc<SnapshotReader>>) -> Json<HashMap<String, String>> {
    let prices = reader.min_prices();
    Json(
        prices
            .iter()
            .map(|(item, price)| (item.clone(), price.to_string()))
            .collect(),
    )
}

async fn weekly_rebates(
    State(reader): State<Arc<SnapshotReader>>,
) -> Json<BTreeMap<i64, HashMap<String, String>>> {
    let rebates = reader.weekly_rebates();
    Json(
        rebates
            .iter()
            .map(|(week, accounts)| {
                let accounts = accounts
                    .iter()
                    .map(|(account, rebate)| (account.clone(), rebate.to_string()))
                    .collect();
                (*week, accounts)
            })
            .collect(),
    )
}

async fn all_account_stats(State(reader): State<Arc<SnapshotReader>>) -> Json<AccountStatsMap> {
    Json(reader.all_account_stats().as_ref().clone())
}

async fn account_stats(
    State(reader): State<Arc<SnapshotReader>>,
    Path(id): Path<String>,
) -> Json<AccountStats> {
    Json(reader.account_stats(&id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_default_to_full_window() {
        let params: PageParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.first, 10_000);

        let params: PageParams =
            serde_json::from_value(serde_json::json!({ "skip": 20, "first": 5 })).unwrap();
        assert_eq!(params.skip, 20);
        assert_eq!(params.first, 5);
    }

    #[test]
    fn test_router_builds() {
        let reader = Arc::new(SnapshotReader::new(Arc::new(
            crate::cache::AppCache::new(),
        )));
        let _ = router(reader);
    }
}
