//! Joined `items_parses` + `items` rows for listing and lookup.
//!
//! `items_parses` is the driving table and `items` is LEFT JOINed, so every
//! catalog column is nullable here even though the parse columns are not.

use eqitems_core::pagination::PageInfo;
use eqitems_core::types::{ItemId, ItemType};
use serde::Serialize;
use sqlx::FromRow;

/// An item's parse metrics joined with its catalog entry.
///
/// Field names match the SQL column aliases and serialize unchanged.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemRow {
    // -- items_parses --
    pub item_id: ItemId,
    pub mh_dps: Option<f64>,
    pub oh_dps: Option<f64>,
    pub mh_oh_dps: Option<f64>,
    pub mh_spell_dps: Option<f64>,
    pub oh_spell_dps: Option<f64>,
    pub bs_dps: Option<f64>,
    pub bane_dps: Option<f64>,
    pub total_dps: Option<f64>,
    pub notes: Option<String>,

    // -- items --
    pub name: Option<String>,
    pub icon: Option<i32>,
    pub itemtype: Option<ItemType>,
    pub classes: Option<i32>,
    pub races: Option<i32>,
    pub slots: Option<i32>,
    pub damage: Option<i32>,
    pub delay: Option<i32>,
    pub ac: Option<i32>,
    pub hp: Option<i32>,
    pub mana: Option<i32>,
    pub endur: Option<i32>,
    pub astr: Option<i32>,
    pub asta: Option<i32>,
    pub aagi: Option<i32>,
    pub adex: Option<i32>,
    pub acha: Option<i32>,
    pub aint: Option<i32>,
    pub awis: Option<i32>,
    pub heroic_str: Option<i32>,
    pub heroic_sta: Option<i32>,
    pub heroic_agi: Option<i32>,
    pub heroic_dex: Option<i32>,
    pub heroic_cha: Option<i32>,
    pub heroic_int: Option<i32>,
    pub heroic_wis: Option<i32>,
    pub reqlevel: Option<i32>,
    pub reclevel: Option<i32>,
    pub weight: Option<i32>,
    pub price: Option<i32>,
    pub proceffect: Option<i32>,
    pub clickeffect: Option<i32>,
    pub clicktype: Option<i32>,
    pub worneffect: Option<i32>,
    pub worntype: Option<i32>,
    pub focuseffect: Option<i32>,
}

/// One page of the item listing.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPage {
    pub items: Vec<ItemRow>,
    pub pagination: PageInfo,
}
