//! Per-account activity counters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cache::AccountStatsMap;
use crate::model::{HeroAction, HeroDeath, ItemAction, ItemUse, PvpFight};

// Hero action codes.
pub const ACTION_BOSS_KILLED: i64 = 3;
pub const ACTION_DUNGEON_COMPLETED: i64 = 4;

// Item action codes.
pub const ITEM_ACTION_REPAIRED: i64 = 0;
pub const ITEM_ACTION_AUGMENTED: i64 = 3;
pub const ITEM_ACTION_AUGMENT_FAILED: i64 = 7;

/// Consumable name marker for the resurrection chicken.
pub const CHICKEN_ITEM_MARKER: &str = "CONS_21";

/// Activity counters for one account. The wire field names are frozen API,
/// `chickedUsed` spelling included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub id: String,
    pub boss_killed: u32,
    pub hero_died: u32,
    pub dungeon_completed: u32,
    #[serde(rename = "chickedUsed")]
    pub chicken_used: u32,
    pub items_augment: u32,
    pub successful_augment: u32,
    pub max_augment_level: u32,
    pub items_repaired: u32,
    pub items_used: u32,
    pub pvp_fights: u32,
    pub pvp_wins: u32,
}

impl AccountStats {
    /// Zero-valued counters for `id`.
    pub fn zero(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

/// The five independently fetched record sets the rollup scans.
#[derive(Debug, Default)]
pub struct ActivityRecords {
    pub hero_actions: Vec<HeroAction>,
    pub hero_deaths: Vec<HeroDeath>,
    pub item_actions: Vec<ItemAction>,
    pub item_uses: Vec<ItemUse>,
    pub pvp_fights: Vec<PvpFight>,
}

/// Build the per-account rollup from scratch. Every account is
/// zero-initialized on first sight, then incremented per the fixed
/// classification table.
pub fn account_stats(records: &ActivityRecords) -> AccountStatsMap {
    let mut stats: HashMap<String, AccountStats> = HashMap::new();

    for action in &records.hero_actions {
        let entry = entry_for(&mut stats, &action.owner.id);
        match action.action {
            ACTION_BOSS_KILLED => entry.boss_killed += 1,
            ACTION_DUNGEON_COMPLETED => entry.dungeon_completed += 1,
            _ => {}
        }
    }

    for death in &records.hero_deaths {
        // The nested selection is ordered descending, so the first action
        // holds the hero's final owner. Heroes with no actions are skipped.
        let Some(latest) = death.actions.first() else {
            continue;
        };
        entry_for(&mut stats, &latest.owner.id).hero_died += 1;
    }

    for action in &records.item_actions {
        let user = action
            .user
            .as_ref()
            .map(|user| user.id.as_str())
            .unwrap_or("");
        let entry = entry_for(&mut stats, user);
        match action.action {
            ITEM_ACTION_AUGMENTED => {
                entry.items_augment += 1;
                entry.successful_augment += 1;
                if let Some(level) = action.values.first().and_then(|v| v.parse::<u32>().ok()) {
                    if level > entry.max_augment_level {
                        entry.max_augment_level = level;
                    }
                }
            }
            ITEM_ACTION_AUGMENT_FAILED => entry.items_augment += 1,
            ITEM_ACTION_REPAIRED => entry.items_repaired += 1,
            _ => {}
        }
    }

    for used in &records.item_uses {
        let entry = entry_for(&mut stats, &used.user.id);
        entry.items_used += 1;
        if used.item.meta.name.contains(CHICKEN_ITEM_MARKER) {
            entry.chicken_used += 1;
        }
    }

    for fight in &records.pvp_fights {
        entry_for(&mut stats, &fight.user_a.id).pvp_fights += 1;
        entry_for(&mut stats, &fight.user_b.id).pvp_fights += 1;

        let winner = if fight.is_winner_a {
            &fight.user_a.id
        } else {
            &fight.user_b.id
        };
        entry_for(&mut stats, winner).pvp_wins += 1;
    }

    stats
}

fn entry_for<'a>(stats: &'a mut HashMap<String, AccountStats>, id: &str) -> &'a mut AccountStats {
    stats
        .entry(id.to_string())
        .or_insert_with(|| AccountStats::zero(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountRef, HeroDeathAction, UsedItem, UsedItemMeta};

    fn owner(id: &str) -> AccountRef {
        AccountRef { id: id.to_string() }
    }

    fn hero_action(id: &str, action: i64, user: &str) -> HeroAction {
        HeroAction {
            id: id.to_string(),
            action,
            owner: owner(user),
        }
    }

    fn item_action(id: &str, action: i64, user: Option<&str>, values: &[&str]) -> ItemAction {
        ItemAction {
            id: id.to_string(),
            action,
            user: user.map(owner),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn item_use(id: &str, user: &str, name: &str) -> ItemUse {
        ItemUse {
            id: id.to_string(),
            user: owner(user),
            item: UsedItem {
                meta: UsedItemMeta {
                    name: name.to_string(),
                },
            },
        }
    }

    #[test]
    fn test_boss_kill_and_death_for_same_account() {
        let records = ActivityRecords {
            hero_actions: vec![hero_action("a1", ACTION_BOSS_KILLED, "0xU")],
            hero_deaths: vec![HeroDeath {
                id: "h1".to_string(),
                actions: vec![HeroDeathAction { owner: owner("0xU") }],
            }],
            ..Default::default()
        };

        let stats = account_stats(&records);
        let expected = AccountStats {
            boss_killed: 1,
            hero_died: 1,
            ..AccountStats::zero("0xU")
        };
        assert_eq!(stats["0xU"], expected);
    }

    #[test]
    fn test_dead_hero_without_actions_is_skipped() {
        let records = ActivityRecords {
            hero_deaths: vec![HeroDeath {
                id: "h1".to_string(),
                actions: Vec::new(),
            }],
            ..Default::default()
        };

        assert!(account_stats(&records).is_empty());
    }

    #[test]
    fn test_item_action_classification() {
        let records = ActivityRecords {
            item_actions: vec![
                item_action("i1", ITEM_ACTION_AUGMENTED, Some("0xU"), &["4"]),
                item_action("i2", ITEM_ACTION_AUGMENTED, Some("0xU"), &["2"]),
                item_action("i3", ITEM_ACTION_AUGMENT_FAILED, Some("0xU"), &[]),
                item_action("i4", ITEM_ACTION_REPAIRED, Some("0xU"), &[]),
                // Allowlisted but unclassified code: account exists, no counter moves.
                item_action("i5", 2, Some("0xV"), &[]),
            ],
            ..Default::default()
        };

        let stats = account_stats(&records);
        assert_eq!(stats["0xU"].items_augment, 3);
        assert_eq!(stats["0xU"].successful_augment, 2);
        assert_eq!(stats["0xU"].max_augment_level, 4);
        assert_eq!(stats["0xU"].items_repaired, 1);
        assert_eq!(stats["0xV"], AccountStats::zero("0xV"));
    }

    #[test]
    fn test_item_action_without_user_buckets_to_empty_id() {
        let records = ActivityRecords {
            item_actions: vec![item_action("i1", ITEM_ACTION_REPAIRED, None, &[])],
            ..Default::default()
        };

        let stats = account_stats(&records);
        assert_eq!(stats[""].items_repaired, 1);
    }

    #[test]
    fn test_item_use_counts_and_chicken_marker() {
        let records = ActivityRecords {
            item_uses: vec![
                item_use("u1", "0xU", "SACRA_CONS_21_ITEM"),
                item_use("u2", "0xU", "SACRA_CONS_3_ITEM"),
            ],
            ..Default::default()
        };

        let stats = account_stats(&records);
        assert_eq!(stats["0xU"].items_used, 2);
        assert_eq!(stats["0xU"].chicken_used, 1);
    }

    #[test]
    fn test_pvp_counts_both_sides_and_the_winner() {
        let records = ActivityRecords {
            pvp_fights: vec![
                PvpFight {
                    id: "f1".to_string(),
                    is_winner_a: true,
                    user_a: owner("0xA"),
                    user_b: owner("0xB"),
                },
                PvpFight {
                    id: "f2".to_string(),
                    is_winner_a: false,
                    user_a: owner("0xA"),
                    user_b: owner("0xB"),
                },
            ],
            ..Default::default()
        };

        let stats = account_stats(&records);
        assert_eq!(stats["0xA"].pvp_fights, 2);
        assert_eq!(stats["0xB"].pvp_fights, 2);
        assert_eq!(stats["0xA"].pvp_wins, 1);
        assert_eq!(stats["0xB"].pvp_wins, 1);
    }

    #[test]
    fn test_wire_field_names_are_frozen() {
        let serialized = serde_json::to_value(AccountStats::zero("0xU")).unwrap();
        for field in [
            "id",
            "bossKilled",
            "heroDied",
            "dungeonCompleted",
            "chickedUsed",
            "itemsAugment",
            "successfulAugment",
            "maxAugmentLevel",
            "itemsRepaired",
            "itemsUsed",
            "pvpFights",
            "pvpWins",
        ] {
            assert!(serialized.get(field).is_some(), "missing field {}", field);
        }
    }
}
