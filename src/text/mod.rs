//! Text processing for autocomplete indexing.
//!
//! Normalization and prefix generation are pure functions; the index manager
//! applies them to each item's phrase to decide which prefixes it is filed under.

pub mod normalizer;
pub mod prefixes;

pub use normalizer::{length, normalize, substring};
pub use prefixes::{prefixes_for_phrase, StopWords};
