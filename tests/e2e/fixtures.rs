//! Sample items for E2E tests.

use autocomplete_index::Item;
use serde_json::json;

/// A handful of venues sharing prefixes ("ma", "mad", "ya", ...).
pub fn sample_venues() -> Vec<Item> {
    vec![
        Item::new(1u64, "Madison Square Garden")
            .with_aliases(["MSG"])
            .with_score(95.0)
            .with_extra("data", json!({"city": "New York"})),
        Item::new(2u64, "Yankee Stadium").with_score(80.0),
        Item::new(3u64, "Madame Tussauds").with_score(40.0),
        Item::new(4u64, "The Museum of Modern Art")
            .with_aliases(["MoMA"])
            .with_score(80.0),
    ]
}

/// A venue whose words all need grapheme-aware handling.
pub fn unicode_venue() -> Item {
    Item::new("zurich", "Café Zürich").with_score(10.0)
}
