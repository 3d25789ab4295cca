//! Catalog-wide statistics over `items_parses`.

use std::collections::BTreeMap;

use eqitems_core::types::ItemType;
use sqlx::MySqlPool;

use crate::filter::ITEM_FROM;
use crate::models::stats::{ItemStats, StatsAggregate};

/// Read-only aggregate queries.
pub struct StatsRepo;

impl StatsRepo {
    /// Aggregates over the whole (unfiltered) parse table plus per-type counts.
    pub async fn summary(pool: &MySqlPool) -> Result<ItemStats, sqlx::Error> {
        let (aggregate, type_counts) =
            futures::try_join!(Self::aggregate(pool), Self::type_counts(pool))?;

        tracing::debug!(
            total_items = aggregate.total_items,
            item_types = type_counts.len(),
            "Item stats computed",
        );

        Ok(ItemStats {
            aggregate,
            type_counts,
        })
    }

    async fn aggregate(pool: &MySqlPool) -> Result<StatsAggregate, sqlx::Error> {
        sqlx::query_as::<_, StatsAggregate>(
            "SELECT \
                COUNT(*) AS total_items, \
                MAX(mh_dps) AS max_melee_dps, \
                MAX(mh_spell_dps) AS max_spell_dps, \
                MAX(total_dps) AS max_total_dps, \
                COUNT(CASE WHEN bane_dps > 0 THEN 1 END) AS bane_items, \
                COUNT(CASE WHEN bs_dps > 0 THEN 1 END) AS backstab_items \
             FROM items_parses",
        )
        .fetch_one(pool)
        .await
    }

    /// Row counts keyed by item type. Rows without a catalog type are skipped.
    async fn type_counts(pool: &MySqlPool) -> Result<BTreeMap<ItemType, i64>, sqlx::Error> {
        let query = format!(
            "SELECT i.itemtype, COUNT(*) {ITEM_FROM} \
             WHERE i.itemtype IS NOT NULL \
             GROUP BY i.itemtype"
        );

        let rows = sqlx::query_as::<_, (ItemType, i64)>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
