//! Snapshot rollups: each module rebuilds one derived view from scratch
//! out of the raw record snapshots.

pub mod accounts;
pub mod prices;
pub mod rebates;

pub use accounts::{account_stats, AccountStats, ActivityRecords};
pub use prices::min_prices;
pub use rebates::{epoch_week, weekly_rebates};
