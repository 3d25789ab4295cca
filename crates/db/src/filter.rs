//! SQL predicate and ORDER BY assembly for the item listing.
//!
//! Only fixed fragments and allow-listed column names ever reach the
//! statement text. User-supplied values travel as positional `?` binds, and
//! the bind list is kept in the same order as the placeholders it fills.

use eqitems_core::filter::{DpsRange, ItemFilter, SortField};
use sqlx::mysql::MySqlArguments;
use sqlx::MySql;

/// `FROM` clause shared by every listing and lookup statement.
pub const ITEM_FROM: &str = "FROM items_parses ip LEFT JOIN items i ON ip.item_id = i.id";

/// Escape character used in `LIKE ... ESCAPE` clauses.
const LIKE_ESCAPE: char = '!';

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Double(f64),
    BigInt(i64),
}

/// WHERE clause text (without the `WHERE` keyword) and its ordered binds.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPredicate {
    pub clause: String,
    pub binds: Vec<BindValue>,
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Build the listing predicate for `filter`.
///
/// Fragments, in order: the `1=1` seed, search, melee range, spell range,
/// bane, backstab, item types. The DPS ranges are always present; with
/// default bounds they are effectively open.
pub fn build_item_predicate(filter: &ItemFilter) -> ItemPredicate {
    let mut conditions: Vec<String> = vec!["1=1".to_string()];
    let mut binds: Vec<BindValue> = Vec::new();

    if !filter.search.is_empty() {
        conditions.push(format!(
            "(LOWER(i.Name) LIKE ? ESCAPE '{LIKE_ESCAPE}' \
             OR LOWER(ip.notes) LIKE ? ESCAPE '{LIKE_ESCAPE}')"
        ));
        let pattern = contains_pattern(&filter.search);
        binds.push(BindValue::Text(pattern.clone()));
        binds.push(BindValue::Text(pattern));
    }

    push_range(&mut conditions, &mut binds, "ip.mh_dps", filter.melee_dps);
    push_range(&mut conditions, &mut binds, "ip.mh_spell_dps", filter.spell_dps);

    if filter.has_bane {
        conditions.push("ip.bane_dps > 0".to_string());
    }

    if filter.has_backstab {
        conditions.push("ip.bs_dps > 0".to_string());
    }

    if !filter.item_types.is_empty() {
        let placeholders = vec!["?"; filter.item_types.len()].join(", ");
        conditions.push(format!("i.itemtype IN ({placeholders})"));
        binds.extend(filter.item_types.iter().copied().map(BindValue::BigInt));
    }

    ItemPredicate {
        clause: conditions.join(" AND "),
        binds,
    }
}

fn push_range(
    conditions: &mut Vec<String>,
    binds: &mut Vec<BindValue>,
    column: &'static str,
    range: DpsRange,
) {
    conditions.push(format!("{column} >= ? AND {column} <= ?"));
    binds.push(BindValue::Double(range.min));
    binds.push(BindValue::Double(range.max));
}

/// Lower-case `%text%` pattern with LIKE wildcards in `text` escaped.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.to_lowercase().chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Physical column for each allow-listed sort field.
///
/// `name` lives on the joined `items` table; everything else is a column of
/// `items_parses` with the same name.
pub fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::ItemId => "ip.item_id",
        SortField::Name => "i.Name",
        SortField::MhDps => "ip.mh_dps",
        SortField::MhSpellDps => "ip.mh_spell_dps",
        SortField::OhSpellDps => "ip.oh_spell_dps",
        SortField::OhDps => "ip.oh_dps",
        SortField::MhOhDps => "ip.mh_oh_dps",
        SortField::BsDps => "ip.bs_dps",
        SortField::BaneDps => "ip.bane_dps",
        SortField::TotalDps => "ip.total_dps",
    }
}

/// ORDER BY text (without the keywords) for the filter's sort.
///
/// Non-identifier sorts get `ip.item_id ASC` as a tiebreaker so page
/// boundaries are stable.
pub fn order_by_clause(filter: &ItemFilter) -> String {
    let column = sort_column(filter.sort);
    let direction = filter.direction.as_sql();

    match filter.sort {
        SortField::ItemId => format!("{column} {direction}"),
        _ => format!("{column} {direction}, ip.item_id ASC"),
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub(crate) fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, MySql, O, MySqlArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, MySql, O, MySqlArguments> {
    for val in bind_values {
        q = match val {
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::Double(v) => q.bind(*v),
            BindValue::BigInt(v) => q.bind(*v),
        };
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
pub(crate) fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, MySql, i64, MySqlArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, MySql, i64, MySqlArguments> {
    for val in bind_values {
        q = match val {
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::Double(v) => q.bind(*v),
            BindValue::BigInt(v) => q.bind(*v),
        };
    }
    q
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use eqitems_core::filter::SortDirection;

    use super::*;

    fn placeholder_count(clause: &str) -> usize {
        clause.matches('?').count()
    }

    #[test]
    fn default_filter_has_seed_and_both_ranges() {
        let predicate = build_item_predicate(&ItemFilter::default());

        assert_eq!(
            predicate.clause,
            "1=1 AND ip.mh_dps >= ? AND ip.mh_dps <= ? \
             AND ip.mh_spell_dps >= ? AND ip.mh_spell_dps <= ?"
        );
        assert_eq!(
            predicate.binds,
            vec![
                BindValue::Double(0.0),
                BindValue::Double(9999.0),
                BindValue::Double(0.0),
                BindValue::Double(9999.0),
            ]
        );
    }

    #[test]
    fn binds_follow_placeholder_order_with_every_filter() {
        let filter = ItemFilter {
            search: "Fang".to_string(),
            melee_dps: DpsRange { min: 1.0, max: 2.0 },
            spell_dps: DpsRange { min: 3.0, max: 4.0 },
            has_bane: true,
            has_backstab: true,
            item_types: vec![2, 0],
            ..ItemFilter::default()
        };

        let predicate = build_item_predicate(&filter);

        assert_eq!(
            predicate.clause,
            "1=1 AND (LOWER(i.Name) LIKE ? ESCAPE '!' OR LOWER(ip.notes) LIKE ? ESCAPE '!') \
             AND ip.mh_dps >= ? AND ip.mh_dps <= ? \
             AND ip.mh_spell_dps >= ? AND ip.mh_spell_dps <= ? \
             AND ip.bane_dps > 0 AND ip.bs_dps > 0 AND i.itemtype IN (?, ?)"
        );
        assert_eq!(
            predicate.binds,
            vec![
                BindValue::Text("%fang%".to_string()),
                BindValue::Text("%fang%".to_string()),
                BindValue::Double(1.0),
                BindValue::Double(2.0),
                BindValue::Double(3.0),
                BindValue::Double(4.0),
                BindValue::BigInt(2),
                BindValue::BigInt(0),
            ]
        );
    }

    #[test]
    fn bind_count_matches_placeholders_for_all_combinations() {
        for mask in 0u8..16 {
            let filter = ItemFilter {
                search: if mask & 1 != 0 { "x".into() } else { String::new() },
                has_bane: mask & 2 != 0,
                has_backstab: mask & 4 != 0,
                item_types: if mask & 8 != 0 { vec![1, 2, 3] } else { Vec::new() },
                ..ItemFilter::default()
            };

            let predicate = build_item_predicate(&filter);

            assert_eq!(
                placeholder_count(&predicate.clause),
                predicate.binds.len(),
                "mask {mask:#06b}: {}",
                predicate.clause
            );
        }
    }

    #[test]
    fn search_escapes_like_wildcards() {
        let filter = ItemFilter {
            search: "50%_Off!".to_string(),
            ..ItemFilter::default()
        };

        let predicate = build_item_predicate(&filter);

        assert_eq!(
            predicate.binds[0],
            BindValue::Text("%50!%!_off!!%".to_string())
        );
    }

    #[test]
    fn search_text_never_enters_clause() {
        let filter = ItemFilter {
            search: "'; DROP TABLE items; --".to_string(),
            ..ItemFilter::default()
        };

        let predicate = build_item_predicate(&filter);

        assert!(!predicate.clause.contains("DROP"));
    }

    #[test]
    fn name_sort_uses_joined_column() {
        let filter = ItemFilter {
            sort: SortField::Name,
            direction: SortDirection::Desc,
            ..ItemFilter::default()
        };

        assert_eq!(order_by_clause(&filter), "i.Name DESC, ip.item_id ASC");
    }

    #[test]
    fn default_sort_is_item_id_ascending() {
        assert_eq!(order_by_clause(&ItemFilter::default()), "ip.item_id ASC");
    }

    #[test]
    fn parse_columns_map_to_same_name() {
        for field in SortField::ALL {
            if field == SortField::Name {
                continue;
            }
            assert_eq!(sort_column(field), format!("ip.{}", field.as_param()));
        }
    }
}
