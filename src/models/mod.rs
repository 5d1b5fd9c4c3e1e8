//! Data models for indexed items.

pub mod item;

pub use item::{Item, ItemId};
