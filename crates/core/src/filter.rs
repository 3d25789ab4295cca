//! Request-scoped item listing filter.
//!
//! [`ItemFilter::from_query`] is the single place where listing query
//! parameters are interpreted. Everything downstream (the SQL builder in
//! `eqitems-db`) works on the typed filter only.

use crate::error::CoreError;
use crate::query_params::{
    parse_flag_param, parse_item_types_param, parse_number_param, parse_text_param, ParamValue,
    RawQuery,
};
use crate::types::ItemTypeCode;

/// Lower bound applied when a DPS minimum is missing or malformed.
pub const DEFAULT_MIN_DPS: f64 = 0.0;

/// Upper bound applied when a DPS maximum is missing or malformed.
pub const DEFAULT_MAX_DPS: f64 = 9999.0;

/// Query-string token selecting descending order.
pub const DESCENDING_TOKEN: &str = "desc";

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Allow-listed sort keys for the item listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    ItemId,
    Name,
    MhDps,
    MhSpellDps,
    OhSpellDps,
    OhDps,
    MhOhDps,
    BsDps,
    BaneDps,
    TotalDps,
}

impl SortField {
    /// Every sortable field, in allow-list order.
    pub const ALL: [SortField; 10] = [
        SortField::ItemId,
        SortField::Name,
        SortField::MhDps,
        SortField::MhSpellDps,
        SortField::OhSpellDps,
        SortField::OhDps,
        SortField::MhOhDps,
        SortField::BsDps,
        SortField::BaneDps,
        SortField::TotalDps,
    ];

    /// The `sortBy` value that selects this field.
    pub fn as_param(self) -> &'static str {
        match self {
            SortField::ItemId => "item_id",
            SortField::Name => "name",
            SortField::MhDps => "mh_dps",
            SortField::MhSpellDps => "mh_spell_dps",
            SortField::OhSpellDps => "oh_spell_dps",
            SortField::OhDps => "oh_dps",
            SortField::MhOhDps => "mh_oh_dps",
            SortField::BsDps => "bs_dps",
            SortField::BaneDps => "bane_dps",
            SortField::TotalDps => "total_dps",
        }
    }

    /// Resolve a `sortBy` value. Unknown or missing values fall back to the
    /// default field.
    pub fn from_param(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::ALL.into_iter().find(|field| field.as_param() == v))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Only the exact token `desc` selects descending order.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(DESCENDING_TOKEN) => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Inclusive DPS bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpsRange {
    pub min: f64,
    pub max: f64,
}

impl Default for DpsRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_DPS,
            max: DEFAULT_MAX_DPS,
        }
    }
}

/// Filter, sort and search options for one listing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Case-insensitive substring matched against item name or parse notes.
    pub search: String,
    pub melee_dps: DpsRange,
    pub spell_dps: DpsRange,
    pub has_bane: bool,
    pub has_backstab: bool,
    pub item_types: Vec<ItemTypeCode>,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl ItemFilter {
    /// Build a filter from listing query parameters.
    ///
    /// Only a malformed `itemTypes` value is rejected; every other parameter
    /// falls back to its default.
    pub fn from_query(query: &RawQuery) -> Result<Self, CoreError> {
        let item_types = parse_item_types_param(&query.get("itemTypes"))?;

        Ok(Self {
            search: parse_text_param(&query.get("search")),
            melee_dps: DpsRange {
                min: parse_number_param(&query.get("minMeleeDps"), DEFAULT_MIN_DPS),
                max: parse_number_param(&query.get("maxMeleeDps"), DEFAULT_MAX_DPS),
            },
            spell_dps: DpsRange {
                min: parse_number_param(&query.get("minSpellDps"), DEFAULT_MIN_DPS),
                max: parse_number_param(&query.get("maxSpellDps"), DEFAULT_MAX_DPS),
            },
            has_bane: parse_flag_param(&query.get("hasBane")),
            has_backstab: parse_flag_param(&query.get("hasBackstab")),
            item_types,
            sort: SortField::from_param(single_value(query, "sortBy").as_deref()),
            direction: SortDirection::from_param(single_value(query, "sortOrder").as_deref()),
        })
    }
}

/// Sort keys are only honoured when supplied once.
fn single_value(query: &RawQuery, name: &str) -> Option<String> {
    match query.get(name) {
        ParamValue::Single(value) => Some(value),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn query(pairs: &[(&str, &str)]) -> RawQuery {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_query_yields_defaults() {
        let filter = ItemFilter::from_query(&RawQuery::default()).unwrap();

        assert_eq!(filter, ItemFilter::default());
        assert_eq!(filter.melee_dps, DpsRange { min: 0.0, max: 9999.0 });
        assert_eq!(filter.sort, SortField::ItemId);
        assert_eq!(filter.direction, SortDirection::Asc);
    }

    #[test]
    fn full_query_is_parsed() {
        let filter = ItemFilter::from_query(&query(&[
            ("search", "Blade"),
            ("minMeleeDps", "5"),
            ("maxMeleeDps", "20.5"),
            ("minSpellDps", "1"),
            ("maxSpellDps", "bogus"),
            ("hasBane", "true"),
            ("hasBackstab", "false"),
            ("itemTypes", "0,2"),
            ("sortBy", "total_dps"),
            ("sortOrder", "desc"),
        ]))
        .unwrap();

        assert_eq!(filter.search, "Blade");
        assert_eq!(filter.melee_dps, DpsRange { min: 5.0, max: 20.5 });
        assert_eq!(filter.spell_dps, DpsRange { min: 1.0, max: 9999.0 });
        assert!(filter.has_bane);
        assert!(!filter.has_backstab);
        assert_eq!(filter.item_types, vec![0, 2]);
        assert_eq!(filter.sort, SortField::TotalDps);
        assert_eq!(filter.direction, SortDirection::Desc);
    }

    #[test]
    fn invalid_item_types_rejects_filter() {
        assert_matches!(
            ItemFilter::from_query(&query(&[("itemTypes", "1,x")])),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unknown_sort_field_falls_back_to_default() {
        assert_eq!(SortField::from_param(Some("Name; DROP TABLE items")), SortField::ItemId);
        assert_eq!(SortField::from_param(Some("NAME")), SortField::ItemId);
        assert_eq!(SortField::from_param(None), SortField::ItemId);
    }

    #[test]
    fn every_allow_listed_field_round_trips() {
        for field in SortField::ALL {
            assert_eq!(SortField::from_param(Some(field.as_param())), field);
        }
    }

    #[test]
    fn descending_requires_exact_token() {
        assert_eq!(SortDirection::from_param(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::from_param(Some("DESC")), SortDirection::Asc);
        assert_eq!(SortDirection::from_param(Some("descending")), SortDirection::Asc);
        assert_eq!(SortDirection::from_param(None), SortDirection::Asc);
    }

    #[test]
    fn repeated_sort_keys_fall_back_to_defaults() {
        let filter = ItemFilter::from_query(&query(&[
            ("sortBy", "name"),
            ("sortBy", "mh_dps"),
            ("sortOrder", "desc"),
            ("sortOrder", "desc"),
        ]))
        .unwrap();

        assert_eq!(filter.sort, SortField::ItemId);
        assert_eq!(filter.direction, SortDirection::Asc);
    }
}
