//! Minimum observed acquisition price per collateral item.

use std::collections::HashMap;

use crate::cache::MinPrices;
use crate::model::PawnshopPosition;

/// Build the minimum-price rollup from a full positions snapshot.
///
/// Positions without a collateral item are skipped; a collateral item with
/// no meta falls into the empty key. Amounts are exact integers parsed from
/// the upstream decimal strings; unparseable amounts are dropped.
pub fn min_prices(positions: &[PawnshopPosition]) -> MinPrices {
    let mut prices: HashMap<String, u128> = HashMap::new();

    for position in positions {
        let Some(item) = position.collateral_item.as_ref() else {
            continue;
        };
        let meta_id = item
            .meta
            .as_ref()
            .map(|meta| meta.id.clone())
            .unwrap_or_default();

        let Ok(price) = position.acquired_amount.parse::<u128>() else {
            log::debug!(
                "position {}: unparseable acquiredAmount {:?}",
                position.pos_id,
                position.acquired_amount
            );
            continue;
        };

        let entry = prices.entry(meta_id).or_insert(price);
        if price < *entry {
            *entry = price;
        }
    }

    prices
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn position(pos_id: &str, meta_id: Option<&str>, amount: &str) -> PawnshopPosition {
        let mut raw = json!({
            "posId": pos_id,
            "acquiredAmount": amount,
        });
        if let Some(meta_id) = meta_id {
            raw["collateralItem"] = json!({ "meta": { "id": meta_id } });
        }
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_min_price_is_true_minimum_per_key() {
        let positions = vec![
            position("1", Some("SABRE_1"), "500"),
            position("2", Some("SABRE_1"), "120"),
            position("3", Some("SABRE_1"), "300"),
            position("4", Some("AXE_2"), "90"),
        ];

        let prices = min_prices(&positions);
        assert_eq!(prices["SABRE_1"], 120);
        assert_eq!(prices["AXE_2"], 90);

        // Cross-check against a direct scan.
        let sabre_min = positions
            .iter()
            .filter(|p| {
                p.collateral_item
                    .as_ref()
                    .and_then(|i| i.meta.as_ref())
                    .map(|m| m.id == "SABRE_1")
                    .unwrap_or(false)
            })
            .map(|p| p.acquired_amount.parse::<u128>().unwrap())
            .min();
        assert_eq!(sabre_min, Some(prices["SABRE_1"]));
    }

    #[test]
    fn test_positions_without_collateral_are_skipped() {
        let positions = vec![
            position("1", None, "10"),
            position("2", Some("AXE_2"), "90"),
        ];

        let prices = min_prices(&positions);
        assert_eq!(prices.len(), 1);
        assert_eq!(prices["AXE_2"], 90);
    }

    #[test]
    fn test_amounts_beyond_u64_stay_exact() {
        // 10^21 wei class amounts overflow u64 but not u128.
        let positions = vec![
            position("1", Some("RING_9"), "1000000000000000000001"),
            position("2", Some("RING_9"), "1000000000000000000000"),
        ];

        let prices = min_prices(&positions);
        assert_eq!(prices["RING_9"], 1_000_000_000_000_000_000_000u128);
    }
}
