use std::collections::BTreeMap;

use eqitems_core::types::ItemType;
use serde::Serialize;
use sqlx::FromRow;

/// Catalog-wide aggregates over `items_parses`.
///
/// The maxima are `None` only when the table is empty.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsAggregate {
    pub total_items: i64,
    pub max_melee_dps: Option<f64>,
    pub max_spell_dps: Option<f64>,
    pub max_total_dps: Option<f64>,
    pub bane_items: i64,
    pub backstab_items: i64,
}

/// Aggregates plus the per-item-type row counts.
///
/// Serializes flat: `{ totalItems, ..., typeCounts: { "1": 12, ... } }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    #[serde(flatten)]
    pub aggregate: StatsAggregate,
    pub type_counts: BTreeMap<ItemType, i64>,
}
