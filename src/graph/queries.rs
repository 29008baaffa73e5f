//! GraphQL query documents for the upstream subgraphs.
//!
//! Every document declares `$first`; offset-paginated documents additionally
//! take `$skip`, cursor-paginated ones `$id` (the upstream filters with
//! `id_gt` and orders ascending, which is what makes last-id cursors sound).

/// A named query document plus the response field holding the page records.
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub name: &'static str,
    pub document: &'static str,
    pub field: &'static str,
}

pub const PAWNSHOP_POSITIONS: Query = Query {
    name: "PawnshopPositions",
    field: "pawnshopPositionEntities",
    document: r#"
        query PawnshopPositions($skip: Int!, $first: Int!) {
            pawnshopPositionEntities(
                first: $first,
                skip: $skip,
                where: { borrower_not: null, acquiredAmount_gt: "0" }
                orderBy: acquiredAmount
            ) {
                posId
                borrower { id }
                depositToken { id decimals symbol }
                depositAmount
                open
                posDurationBlocks
                posFee
                createdBlock
                createdTs
                acquiredToken { id decimals symbol }
                acquiredAmount
                collateralItem {
                    itemId
                    meta {
                        id
                        name
                        symbol
                        level
                        itemType
                        durability
                        isAttackItem
                        isBuffItem
                        isConsumableItem
                        pawnshopItemStat { prices }
                    }
                    hero { id }
                    user { id }
                    score
                    augmentationLevel
                    durability
                    rarity
                    equipped
                    burned
                    attributes
                }
                collateralHero {
                    heroId
                    owner { id }
                    meta { id name heroClass }
                    score
                    dead
                    maxBiomeCompleted
                    attributes
                    stats { level experience life mana lifeChances }
                }
                collateralToken { id decimals symbol }
                collateralNft
                collateralNftId
            }
        }
    "#,
};

pub const TRANSACTIONS_FROM: Query = Query {
    name: "TransactionsFrom",
    field: "transactionEntities",
    document: r#"
        query TransactionsFrom($timestamp: BigInt!, $first: Int!, $skip: Int!) {
            transactionEntities(
                where: { timestamp_gte: $timestamp }
                first: $first,
                skip: $skip,
                orderBy: timestamp
                orderDirection: desc
            ) {
                id
                from
                gasUsed
                gasPrice
                timestamp
            }
        }
    "#,
};

pub const HERO_ACTIONS: Query = Query {
    name: "HeroActionsByType",
    field: "heroActions",
    document: r#"
        query HeroActionsByType($id: ID!, $first: Int!, $actions: [Int!]!) {
            heroActions(
                first: $first,
                where: { id_gt: $id, action_in: $actions }
                orderBy: id,
                orderDirection: asc,
            ) {
                id
                action
                owner { id }
            }
        }
    "#,
};

pub const HERO_DIED: Query = Query {
    name: "HeroDied",
    field: "heroEntities",
    document: r#"
        query HeroDied($id: ID!, $first: Int!) {
            heroEntities(
                first: $first,
                where: { id_gt: $id, dead: true }
                orderBy: id,
                orderDirection: asc,
            ) {
                id
                actions(first: 1, orderBy: id, orderDirection: desc) {
                    owner { id }
                }
            }
        }
    "#,
};

pub const ITEM_ACTIONS: Query = Query {
    name: "ItemActionsByType",
    field: "itemActionEntities",
    document: r#"
        query ItemActionsByType($id: ID!, $first: Int!, $actions: [Int!]!) {
            itemActionEntities(
                first: $first,
                where: { id_gt: $id, action_in: $actions }
                orderBy: id,
                orderDirection: asc,
            ) {
                id
                action
                user { id }
                values
            }
        }
    "#,
};

pub const ITEM_USED: Query = Query {
    name: "ItemUsed",
    field: "itemUsedEntities",
    document: r#"
        query ItemUsed($id: ID!, $first: Int!) {
            itemUsedEntities(
                first: $first,
                where: { id_gt: $id }
                orderBy: id,
                orderDirection: asc,
            ) {
                id
                item { meta { name } }
                user { id }
            }
        }
    "#,
};

pub const PVP_FIGHTS: Query = Query {
    name: "PvpFights",
    field: "pvpFightEntities",
    document: r#"
        query PvpFights($id: ID!, $first: Int!) {
            pvpFightEntities(
                first: $first,
                where: { id_gt: $id, completed: true }
                orderBy: id,
                orderDirection: asc,
            ) {
                id
                isWinnerA
                userA { id }
                userB { id }
            }
        }
    "#,
};
