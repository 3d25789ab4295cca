//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async read methods
//! that accept `&MySqlPool` as the first argument.

pub mod item_repo;
pub mod stats_repo;

pub use item_repo::ItemRepo;
pub use stats_repo::StatsRepo;
