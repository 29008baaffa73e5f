//! Read-side view over the snapshot cache.

use std::sync::Arc;

use crate::cache::{AccountStatsMap, AppCache, MinPrices, WeeklyRebates};
use crate::model::{PawnshopPosition, TransactionRecord};
use crate::stats::AccountStats;

/// Serves slices and rollups out of whatever snapshots are currently
/// committed. Every call reads one `Arc` swap; nothing here blocks on the
/// refresh loops.
pub struct SnapshotReader {
    cache: Arc<AppCache>,
}

impl SnapshotReader {
    pub fn new(cache: Arc<AppCache>) -> Self {
        Self { cache }
    }

    /// Page of the positions snapshot, `skip` records in, at most `first`
    /// records long. Out-of-range windows come back empty.
    pub fn positions_slice(&self, skip: usize, first: usize) -> Vec<PawnshopPosition> {
        let snapshot = self.cache.positions.get();
        snapshot.records.iter().skip(skip).take(first).cloned().collect()
    }

    /// Page of the transactions snapshot, same windowing as positions.
    pub fn transactions_slice(&self, skip: usize, first: usize) -> Vec<TransactionRecord> {
        let snapshot = self.cache.transactions.get();
        snapshot.records.iter().skip(skip).take(first).cloned().collect()
    }

    pub fn min_prices(&self) -> Arc<MinPrices> {
        self.cache.min_prices.get()
    }

    pub fn weekly_rebates(&self) -> Arc<WeeklyRebates> {
        self.cache.weekly_rebates.get()
    }

    pub fn all_account_stats(&self) -> Arc<AccountStatsMap> {
        self.cache.account_stats.get()
    }

    /// Counters for one account; accounts with no recorded activity get the
    /// zero-valued row rather than a miss.
    pub fn account_stats(&self, id: &str) -> AccountStats {
        self.cache
            .account_stats
            .get()
            .get(id)
            .cloned()
            .unwrap_or_else(|| AccountStats::zero(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Snapshot;
    use serde_json::json;

    fn reader_with_positions(count: usize) -> SnapshotReader {
        let cache = Arc::new(AppCache::new());
        let positions: Vec<PawnshopPosition> = (0..count)
            .map(|i| {
                serde_json::from_value(json!({
                    "posId": i.to_string(),
                    "acquiredAmount": "1",
                }))
                .unwrap()
            })
            .collect();
        cache.positions.commit(Snapshot::new(positions, None));
        SnapshotReader::new(cache)
    }

    #[test]
    fn test_slice_windows() {
        let reader = reader_with_positions(5);

        assert_eq!(reader.positions_slice(0, 3).len(), 3);
        assert_eq!(reader.positions_slice(3, 10).len(), 2);
        assert_eq!(reader.positions_slice(3, 10)[0].pos_id, "3");
        assert!(reader.positions_slice(5, 10).is_empty());
        assert!(reader.positions_slice(100, 10).is_empty());
        assert!(reader.positions_slice(0, 0).is_empty());
    }

    #[test]
    fn test_unknown_account_gets_zero_row() {
        let reader = SnapshotReader::new(Arc::new(AppCache::new()));
        let stats = reader.account_stats("0xnobody");
        assert_eq!(stats, AccountStats::zero("0xnobody"));
    }
}
