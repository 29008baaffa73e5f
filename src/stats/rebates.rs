//! Weekly gas rebate rollup.

use std::collections::HashMap;

use crate::cache::WeeklyRebates;
use crate::model::{Timestamped, TransactionRecord};

pub const SECONDS_IN_DAY: i64 = 24 * 60 * 60;

/// 80% cashback, applied per transaction with exact integer division.
const REBATE_NUMERATOR: u128 = 800;
const REBATE_DIVIDER: u128 = 1000;

pub fn epoch_day(timestamp: i64) -> i64 {
    timestamp.div_euclid(SECONDS_IN_DAY)
}

/// The +3 day offset anchors week boundaries; changing it reshuffles every
/// historical bucket.
pub fn epoch_week(timestamp: i64) -> i64 {
    (epoch_day(timestamp) + 3).div_euclid(7)
}

/// Accumulate `floor(gasUsed * gasPrice * 800 / 1000)` per epoch week per
/// lowercased sender. Rebuilt from the full snapshot every refresh; never
/// patched incrementally.
pub fn weekly_rebates(transactions: &[TransactionRecord]) -> WeeklyRebates {
    let mut rebates = WeeklyRebates::new();

    for tx in transactions {
        let week = epoch_week(tx.timestamp());
        let from = tx.from.as_deref().unwrap_or("").to_lowercase();

        let accounts: &mut HashMap<String, u128> = rebates.entry(week).or_default();
        *accounts.entry(from).or_insert(0) += gas_cost(tx) * REBATE_NUMERATOR / REBATE_DIVIDER;
    }

    rebates
}

/// Gas spent by one transaction, in wei. u128 keeps mainnet-scale products
/// (gasUsed ~1e7 times gasPrice ~1e11) exact.
fn gas_cost(tx: &TransactionRecord) -> u128 {
    let used: u128 = tx.gas_used.as_deref().unwrap_or("0").parse().unwrap_or(0);
    let price: u128 = tx.gas_price.as_deref().unwrap_or("0").parse().unwrap_or(0);
    used * price
}
