/// Item identifiers are the `items.id` / `items_parses.item_id` integer key.
pub type ItemId = i64;

/// Item type codes (`items.itemtype`).
pub type ItemType = i32;

/// Item type codes as accepted from the `itemTypes` filter. Wider than the
/// column so out-of-range codes match nothing instead of being rejected.
pub type ItemTypeCode = i64;
