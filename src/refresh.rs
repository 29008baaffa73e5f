//! Background refresh cycles.
//!
//! Each collection refreshes on its own loop: fetch, rebuild the derived
//! rollups, commit. A failed cycle logs and leaves the previously committed
//! snapshot in place. The sleep starts after the cycle finishes, so slow
//! upstreams stretch the period instead of stacking overlapping cycles.

use serde_json::json;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::cache::{AppCache, Snapshot};
use crate::config::Config;
use crate::error::FetchError;
use crate::graph::{queries, PageCursor, PageSource, Pager, RetryPolicy};
use crate::merge::{high_water_mark, max_timestamp, merge_new};
use crate::model::{
    trim_price_history, HeroAction, HeroDeath, ItemAction, ItemUse, PawnshopPosition, PvpFight,
    TransactionRecord,
};
use crate::stats::{account_stats, min_prices, weekly_rebates, ActivityRecords};

/// Delay step for transaction page retries.
const TRANSACTIONS_BACKOFF_STEP: Duration = Duration::from_secs(1);

/// Run `cycle` forever, sleeping `interval` between the end of one cycle and
/// the start of the next. Errors are logged and swallowed so one bad cycle
/// never kills the loop.
pub async fn refresh_loop<F, Fut>(name: &'static str, interval: Duration, mut cycle: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), FetchError>>,
{
    loop {
        let started = Instant::now();
        match cycle().await {
            Ok(()) => log::info!(
                "{}: refresh finished in {} ms",
                name,
                started.elapsed().as_millis()
            ),
            Err(err) => log::error!("{}: refresh failed, keeping previous data: {}", name, err),
        }
        tokio::time::sleep(interval).await;
    }
}

/// Full refresh of the pawnshop positions collection plus the min-price
/// rollup derived from it.
pub async fn refresh_positions(
    source: &dyn PageSource,
    cache: &AppCache,
    config: &Config,
) -> Result<(), FetchError> {
    let pager = Pager::new(
        source,
        config.page_size,
        RetryPolicy::flat(config.max_retries),
    );
    let positions: Vec<PawnshopPosition> = pager
        .fetch_all(&queries::PAWNSHOP_POSITIONS, PageCursor::offset(), json!({}))
        .await?;

    let positions: Vec<PawnshopPosition> =
        positions.into_iter().map(trim_price_history).collect();

    log::info!("positions: loaded {} records", positions.len());
    cache.min_prices.commit(min_prices(&positions));
    cache.positions.commit(Snapshot::new(positions, None));
    Ok(())
}

/// Incremental refresh of the transactions collection.
///
/// Fetches everything at or above the high-water mark, appends records with
/// unseen ids, and rebuilds the weekly rebate rollup. The rollup is rebuilt
/// even when the delta is empty, so it always reflects the current snapshot
/// after the first cycle.
pub async fn refresh_transactions(
    source: &dyn PageSource,
    cache: &AppCache,
    config: &Config,
) -> Result<(), FetchError> {
    let existing = cache.transactions.get();
    let since = high_water_mark(&existing, config.start_timestamp);

    let pager = Pager::new(
        source,
        config.page_size,
        RetryPolicy::backoff(config.transactions_max_retries, TRANSACTIONS_BACKOFF_STEP),
    );
    let incoming: Vec<TransactionRecord> = pager
        .fetch_all(
            &queries::TRANSACTIONS_FROM,
            PageCursor::offset(),
            json!({ "timestamp": since.to_string() }),
        )
        .await?;

    match merge_new(&existing.records, incoming) {
        Some(merged) => {
            let mark = max_timestamp(&merged);
            log::info!("transactions: {} records after merge", merged.len());
            cache.transactions.commit(Snapshot::new(merged, mark));
        }
        None => log::debug!("transactions: nothing new since {}", since),
    }

    let current = cache.transactions.get();
    cache.weekly_rebates.commit(weekly_rebates(&current.records));
    Ok(())
}

/// Full refresh of the account activity rollup. The five record sets are
/// independent cursor-paginated scans, fetched concurrently.
pub async fn refresh_account_stats(
    source: &dyn PageSource,
    cache: &AppCache,
    config: &Config,
) -> Result<(), FetchError> {
    let pager = Pager::new(
        source,
        config.page_size,
        RetryPolicy::flat(config.max_retries),
    );

    let (hero_actions, hero_deaths, item_actions, item_uses, pvp_fights) = tokio::try_join!(
        pager.fetch_all::<HeroAction>(
            &queries::HERO_ACTIONS,
            PageCursor::after_id(),
            json!({ "actions": config.hero_action_codes }),
        ),
        pager.fetch_all::<HeroDeath>(&queries::HERO_DIED, PageCursor::after_id(), json!({})),
        pager.fetch_all::<ItemAction>(
            &queries::ITEM_ACTIONS,
            PageCursor::after_id(),
            json!({ "actions": config.item_action_codes }),
        ),
        pager.fetch_all::<ItemUse>(&queries::ITEM_USED, PageCursor::after_id(), json!({})),
        pager.fetch_all::<PvpFight>(&queries::PVP_FIGHTS, PageCursor::after_id(), json!({})),
    )?;

    let records = ActivityRecords {
        hero_actions,
        hero_deaths,
        item_actions,
        item_uses,
        pvp_fights,
    };

    let stats = account_stats(&records);
    log::info!("accounts: {} accounts with activity", stats.len());
    cache.account_stats.commit(stats);
    Ok(())
}
