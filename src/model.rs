//! Upstream record types.
//!
//! Entities are typed only where the engine actually reads a field (identity,
//! timestamps, aggregation inputs, the trimmed price history); everything
//! else the subgraph returns rides along untouched in a flattened map, so the
//! cache serves whatever the upstream selection contains.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Records addressable by a collection-unique id.
pub trait Identified {
    fn record_id(&self) -> &str;
}

/// Records ordered by a monotonic timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> i64;
}

/// How many price samples to keep per collateral item stat.
pub const PRICE_HISTORY_WINDOW: usize = 5;

/// An open pawnshop position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PawnshopPosition {
    #[serde(rename = "posId")]
    pub pos_id: String,

    /// Price the position was acquired for, as an upstream decimal string.
    #[serde(rename = "acquiredAmount")]
    pub acquired_amount: String,

    #[serde(
        rename = "collateralItem",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub collateral_item: Option<CollateralItem>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Identified for PawnshopPosition {
    fn record_id(&self) -> &str {
        &self.pos_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ItemMeta>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemMeta {
    pub id: String,

    #[serde(rename = "pawnshopItemStat", default)]
    pub pawnshop_item_stat: Vec<ItemStat>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStat {
    #[serde(default)]
    pub prices: Vec<Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Keep only the most recent [`PRICE_HISTORY_WINDOW`] price samples on each
/// collateral item stat. Applied once per ingested position.
pub fn trim_price_history(mut position: PawnshopPosition) -> PawnshopPosition {
    if let Some(meta) = position
        .collateral_item
        .as_mut()
        .and_then(|item| item.meta.as_mut())
    {
        for stat in meta.pawnshop_item_stat.iter_mut() {
            if stat.prices.len() > PRICE_HISTORY_WINDOW {
                stat.prices = stat.prices.split_off(stat.prices.len() - PRICE_HISTORY_WINDOW);
            }
        }
    }
    position
}

/// A game transaction, ordered by block timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(rename = "gasUsed", default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,

    #[serde(rename = "gasPrice", default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,

    /// Block timestamp as an upstream decimal string.
    pub timestamp: String,
}

impl Identified for TransactionRecord {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Timestamped for TransactionRecord {
    fn timestamp(&self) -> i64 {
        self.timestamp.parse().unwrap_or(0)
    }
}

/// Reference to an account entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroAction {
    pub id: String,
    pub action: i64,
    pub owner: AccountRef,
}

impl Identified for HeroAction {
    fn record_id(&self) -> &str {
        &self.id
    }
}

/// A dead hero together with its most recent action (the upstream orders the
/// nested selection descending, so the first entry is the latest owner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroDeath {
    pub id: String,

    #[serde(default)]
    pub actions: Vec<HeroDeathAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroDeathAction {
    pub owner: AccountRef,
}

impl Identified for HeroDeath {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAction {
    pub id: String,
    pub action: i64,

    #[serde(default)]
    pub user: Option<AccountRef>,

    /// Action arguments; for augmentation the first value is the level.
    #[serde(default)]
    pub values: Vec<String>,
}

impl Identified for ItemAction {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUse {
    pub id: String,
    pub user: AccountRef,
    pub item: UsedItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsedItem {
    pub meta: UsedItemMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsedItemMeta {
    pub name: String,
}

impl Identified for ItemUse {
    fn record_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvpFight {
    pub id: String,

    #[serde(rename = "isWinnerA")]
    pub is_winner_a: bool,

    #[serde(rename = "userA")]
    pub user_a: AccountRef,

    #[serde(rename = "userB")]
    pub user_b: AccountRef,
}

impl Identified for PvpFight {
    fn record_id(&self) -> &str {
        &self.id
    }
}
