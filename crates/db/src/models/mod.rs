//! Row models and response payloads.

pub mod item;
pub mod stats;
