//! Repository for the joined `items_parses` / `items` listing.

use eqitems_core::filter::ItemFilter;
use eqitems_core::pagination::{PageInfo, PageRequest};
use eqitems_core::types::ItemId;
use sqlx::MySqlPool;

use crate::filter::{
    bind_values, bind_values_scalar, build_item_predicate, order_by_clause, BindValue,
    ItemPredicate, ITEM_FROM,
};
use crate::models::item::{ItemPage, ItemRow};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for item SELECT queries. Aliases match [`ItemRow`] fields.
const COLUMNS: &str = "\
    ip.item_id, ip.mh_dps, ip.oh_dps, ip.mh_oh_dps, ip.mh_spell_dps, \
    ip.oh_spell_dps, ip.bs_dps, ip.bane_dps, ip.total_dps, ip.notes, \
    i.Name AS name, i.icon, i.itemtype, i.classes, i.races, i.slots, \
    i.damage, i.delay, i.ac, i.hp, i.mana, i.endur, \
    i.astr, i.asta, i.aagi, i.adex, i.acha, i.aint, i.awis, \
    i.heroic_str, i.heroic_sta, i.heroic_agi, i.heroic_dex, \
    i.heroic_cha, i.heroic_int, i.heroic_wis, \
    i.reqlevel, i.reclevel, i.weight, i.price, \
    i.proceffect, i.clickeffect, i.clicktype, i.worneffect, i.worntype, i.focuseffect";

// ---------------------------------------------------------------------------
// ItemRepo
// ---------------------------------------------------------------------------

/// Read access to parsed items.
pub struct ItemRepo;

impl ItemRepo {
    /// Fetch one page of items matching `filter`, plus the total match count.
    ///
    /// The count and the page query share one predicate and run
    /// concurrently; either failing fails the whole call.
    pub async fn list_page(
        pool: &MySqlPool,
        filter: &ItemFilter,
        page: PageRequest,
    ) -> Result<ItemPage, sqlx::Error> {
        let predicate = build_item_predicate(filter);
        let order_by = order_by_clause(filter);

        let (total, items) = futures::try_join!(
            Self::count_matching(pool, &predicate),
            Self::fetch_matching(pool, &predicate, &order_by, page),
        )?;

        tracing::debug!(
            total,
            returned = items.len(),
            page = page.page,
            page_size = page.page_size,
            "Item page fetched",
        );

        Ok(ItemPage {
            items,
            pagination: PageInfo::new(page, total),
        })
    }

    /// Find a single item by its identifier.
    pub async fn find_by_id(pool: &MySqlPool, id: ItemId) -> Result<Option<ItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {ITEM_FROM} WHERE ip.item_id = ?");
        sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    async fn count_matching(
        pool: &MySqlPool,
        predicate: &ItemPredicate,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) {ITEM_FROM} WHERE {}", predicate.clause);

        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &predicate.binds)
            .fetch_one(pool)
            .await
    }

    async fn fetch_matching(
        pool: &MySqlPool,
        predicate: &ItemPredicate,
        order_by: &str,
        page: PageRequest,
    ) -> Result<Vec<ItemRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {ITEM_FROM} WHERE {} ORDER BY {order_by} LIMIT ? OFFSET ?",
            predicate.clause
        );

        // LIMIT and OFFSET are always the last two placeholders.
        let mut binds = predicate.binds.clone();
        binds.push(BindValue::BigInt(page.limit()));
        binds.push(BindValue::BigInt(page.offset()));

        bind_values(sqlx::query_as::<_, ItemRow>(&query), &binds)
            .fetch_all(pool)
            .await
    }
}
